//! Resolved, query-ready tables.
//!
//! A [`Table`] is immutable once built: its element entries already include
//! every group expansion, so a query is a single map probe followed by the
//! default-value fallback. Results are memoized in a per-table cache that is
//! never invalidated, since nothing can change the answers after construction.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use datatables_primitives::{DEFAULT_VALUE, TableKind};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;


static DUMMY: LazyLock<Arc<Table>> = LazyLock::new(|| {
	let mut table = TableBuilder::new(TableKind::Misc, DEFAULT_VALUE).build();
	table.caching = false;
	Arc::new(table)
});

/// Query cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
	/// Queries answered from the cache.
	pub hits: u64,
	/// Queries that consulted the entry map.
	pub lookups: u64,
}

/// A resolved data table.
pub struct Table {
	kind: TableKind,
	default_value: i32,
	elements: FxHashMap<Arc<str>, i32>,
	groups: FxHashMap<Arc<str>, i32>,
	cache: RwLock<FxHashMap<Arc<str>, i32>>,
	caching: bool,
	hits: AtomicU64,
	lookups: AtomicU64,
}

impl Table {
	/// Shared zero-value table handed out for unknown or not-yet-resolved ids.
	///
	/// Shared by every registry, so it neither caches queries nor counts them.
	pub fn dummy() -> Arc<Table> {
		Arc::clone(&DUMMY)
	}

	pub fn kind(&self) -> TableKind {
		self.kind
	}

	pub fn default_value(&self) -> i32 {
		self.default_value
	}

	/// Returns the value for `id`, falling back to the default value.
	///
	/// Never fails; an absent identifier is a normal outcome.
	pub fn query(&self, id: &str) -> i32 {
		if !self.caching {
			return self.elements.get(id).copied().unwrap_or(self.default_value);
		}
		if let Some(&value) = self.cache.read().get(id) {
			self.hits.fetch_add(1, Ordering::Relaxed);
			return value;
		}

		self.lookups.fetch_add(1, Ordering::Relaxed);
		let value = self.elements.get(id).copied().unwrap_or(self.default_value);
		// Racing queries compute the same value, so whichever insert lands first is correct.
		self.cache.write().entry(Arc::from(id)).or_insert(value);
		value
	}

	/// Returns true if `id` has an element entry, explicit or group-derived.
	pub fn contains(&self, id: &str) -> bool {
		self.elements.contains_key(id)
	}

	/// Number of element entries.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Element entries sorted by identifier.
	pub fn elements(&self) -> Vec<(&Arc<str>, i32)> {
		sorted(&self.elements)
	}

	/// Group entries this table was expanded from, sorted by group id.
	///
	/// Empty for tables received through a sync snapshot.
	pub fn group_entries(&self) -> Vec<(&Arc<str>, i32)> {
		sorted(&self.groups)
	}

	pub fn stats(&self) -> TableStats {
		TableStats {
			hits: self.hits.load(Ordering::Relaxed),
			lookups: self.lookups.load(Ordering::Relaxed),
		}
	}
}

fn sorted(map: &FxHashMap<Arc<str>, i32>) -> Vec<(&Arc<str>, i32)> {
	let mut out: Vec<_> = map.iter().map(|(id, &value)| (id, value)).collect();
	out.sort_unstable_by(|a, b| a.0.cmp(b.0));
	out
}

impl fmt::Debug for Table {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Table")
			.field("kind", &self.kind)
			.field("default_value", &self.default_value)
			.field("elements", &self.elements.len())
			.field("groups", &self.groups.len())
			.finish_non_exhaustive()
	}
}

/// Accumulates entries for a [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
	kind: TableKind,
	default_value: i32,
	elements: FxHashMap<Arc<str>, i32>,
	groups: FxHashMap<Arc<str>, i32>,
}

impl TableBuilder {
	pub fn new(kind: TableKind, default_value: i32) -> Self {
		Self {
			kind,
			default_value,
			elements: FxHashMap::default(),
			groups: FxHashMap::default(),
		}
	}

	/// Sets an element entry, replacing any previous value.
	pub fn element(&mut self, id: Arc<str>, value: i32) -> &mut Self {
		self.elements.insert(id, value);
		self
	}

	/// Sets an element entry unless one already exists. Returns true if inserted.
	pub fn element_if_absent(&mut self, id: Arc<str>, value: i32) -> bool {
		match self.elements.entry(id) {
			std::collections::hash_map::Entry::Vacant(v) => {
				v.insert(value);
				true
			}
			std::collections::hash_map::Entry::Occupied(_) => false,
		}
	}

	/// Records a group entry. Group entries are informational once expanded.
	pub fn group(&mut self, id: Arc<str>, value: i32) -> &mut Self {
		self.groups.insert(id, value);
		self
	}

	pub fn build(self) -> Table {
		Table {
			kind: self.kind,
			default_value: self.default_value,
			elements: self.elements,
			groups: self.groups,
			cache: RwLock::new(FxHashMap::default()),
			caching: true,
			hits: AtomicU64::new(0),
			lookups: AtomicU64::new(0),
		}
	}
}
