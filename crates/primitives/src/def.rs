use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::key::EntryKey;
use crate::kind::TableKind;

/// Default value of a definition that does not declare one.
pub const DEFAULT_VALUE: i32 = 0;

/// One table definition as supplied by a definition source, before inheritance
/// and group expansion.
///
/// Immutable once built; use [`RawDefinition::builder`] to construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDefinition {
	id: Arc<str>,
	kind: TableKind,
	parents: Vec<Arc<str>>,
	default_value: i32,
	entries: FxHashMap<EntryKey, i32>,
}

impl RawDefinition {
	pub fn builder(id: impl Into<Arc<str>>) -> RawDefinitionBuilder {
		RawDefinitionBuilder::new(id)
	}

	pub fn id(&self) -> &Arc<str> {
		&self.id
	}

	pub fn kind(&self) -> TableKind {
		self.kind
	}

	/// Parent ids in declared order. Later parents override earlier ones.
	pub fn parents(&self) -> &[Arc<str>] {
		&self.parents
	}

	pub fn default_value(&self) -> i32 {
		self.default_value
	}

	/// The definition's own entries, excluding anything inherited.
	pub fn entries(&self) -> &FxHashMap<EntryKey, i32> {
		&self.entries
	}
}

/// Accumulates the fields of a [`RawDefinition`].
#[derive(Debug, Clone)]
pub struct RawDefinitionBuilder {
	id: Arc<str>,
	kind: TableKind,
	parents: Vec<Arc<str>>,
	default_value: i32,
	entries: FxHashMap<EntryKey, i32>,
}

impl RawDefinitionBuilder {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self {
			id: id.into(),
			kind: TableKind::default(),
			parents: Vec::new(),
			default_value: DEFAULT_VALUE,
			entries: FxHashMap::default(),
		}
	}

	pub fn kind(mut self, kind: TableKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn default_value(mut self, value: i32) -> Self {
		self.default_value = value;
		self
	}

	/// Appends a parent; declaration order is preserved.
	pub fn parent(mut self, id: impl Into<Arc<str>>) -> Self {
		self.parents.push(id.into());
		self
	}

	pub fn parents<I, S>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Arc<str>>,
	{
		self.parents.extend(ids.into_iter().map(Into::into));
		self
	}

	/// Sets a direct element entry, replacing any earlier value for the same id.
	pub fn entry(mut self, id: impl Into<Arc<str>>, value: i32) -> Self {
		self.entries.insert(EntryKey::element(id), value);
		self
	}

	/// Sets a group entry, replacing any earlier value for the same group.
	pub fn group(mut self, id: impl Into<Arc<str>>, value: i32) -> Self {
		self.entries.insert(EntryKey::group(id), value);
		self
	}

	/// Sets an entry from an already-parsed key.
	pub fn key(mut self, key: EntryKey, value: i32) -> Self {
		self.entries.insert(key, value);
		self
	}

	pub fn build(self) -> RawDefinition {
		RawDefinition {
			id: self.id,
			kind: self.kind,
			parents: self.parents,
			default_value: self.default_value,
			entries: self.entries,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn builder_defaults() {
		let def = RawDefinition::builder("t").build();
		assert_eq!(def.id().as_ref(), "t");
		assert_eq!(def.kind(), TableKind::Misc);
		assert!(def.parents().is_empty());
		assert_eq!(def.default_value(), DEFAULT_VALUE);
		assert!(def.entries().is_empty());
	}

	#[test]
	fn builder_keeps_parent_order_and_last_entry_write() {
		let def = RawDefinition::builder("child")
			.kind(TableKind::Item)
			.parent("a")
			.parents(["b", "c"])
			.entry("x", 1)
			.entry("x", 2)
			.group("x", 3)
			.build();

		let parents: Vec<&str> = def.parents().iter().map(|p| p.as_ref()).collect();
		assert_eq!(parents, vec!["a", "b", "c"]);
		assert_eq!(def.entries().get(&EntryKey::element("x")), Some(&2));
		assert_eq!(def.entries().get(&EntryKey::group("x")), Some(&3));
		assert_eq!(def.entries().len(), 2);
	}
}
