//! Group membership capability table.
//!
//! Group entries (`#group`) are expanded through a [`GroupMembership`]
//! provider chosen by the table's [`TableKind`]. Providers are supplied by the
//! host; a kind without a provider knows no groups at all.

use std::fmt;
use std::sync::Arc;

use datatables_primitives::TableKind;
use rustc_hash::FxHashMap;

/// Answers "which identifiers belong to this group?".
pub trait GroupMembership: Send + Sync {
	/// Members of `group`, or `None` if the group is unknown.
	fn members(&self, group: &str) -> Option<Vec<Arc<str>>>;
}

impl<F> GroupMembership for F
where
	F: Fn(&str) -> Option<Vec<Arc<str>>> + Send + Sync,
{
	fn members(&self, group: &str) -> Option<Vec<Arc<str>>> {
		self(group)
	}
}

/// In-memory group membership, for hosts that materialize their groups up front.
#[derive(Debug, Clone, Default)]
pub struct StaticGroups {
	groups: FxHashMap<Arc<str>, Vec<Arc<str>>>,
}

impl StaticGroups {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `members` to `group`, creating the group if needed.
	pub fn with<I, S>(mut self, group: impl Into<Arc<str>>, members: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Arc<str>>,
	{
		self.insert(group, members);
		self
	}

	pub fn insert<I, S>(&mut self, group: impl Into<Arc<str>>, members: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<Arc<str>>,
	{
		self.groups
			.entry(group.into())
			.or_default()
			.extend(members.into_iter().map(Into::into));
	}
}

impl GroupMembership for StaticGroups {
	fn members(&self, group: &str) -> Option<Vec<Arc<str>>> {
		self.groups.get(group).cloned()
	}
}

/// Maps each table kind to the provider that expands its groups.
#[derive(Clone, Default)]
pub struct GroupProviders {
	providers: FxHashMap<TableKind, Arc<dyn GroupMembership>>,
}

impl GroupProviders {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, kind: TableKind, provider: impl GroupMembership + 'static) -> Self {
		self.insert(kind, Arc::new(provider));
		self
	}

	/// Installs `provider` for `kind`, replacing any previous one.
	pub fn insert(&mut self, kind: TableKind, provider: Arc<dyn GroupMembership>) {
		self.providers.insert(kind, provider);
	}

	pub fn get(&self, kind: TableKind) -> Option<&dyn GroupMembership> {
		self.providers.get(&kind).map(|p| p.as_ref())
	}
}

impl fmt::Debug for GroupProviders {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut kinds: Vec<_> = self.providers.keys().copied().collect();
		kinds.sort();
		f.debug_struct("GroupProviders").field("kinds", &kinds).finish()
	}
}
