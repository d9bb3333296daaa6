//! Synchronization snapshots of a resolved registry.
//!
//! A [`SyncSnapshot`] is the transmissible projection of a resolved registry:
//! table ids with their kind, default value and element entries. Group entries
//! and provenance are not carried, since groups are already expanded.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::table::Table;

mod codec;
mod limits;

pub use codec::{HEADER_SIZE, MAGIC, SCHEMA_VERSION, decode, encode};
pub use limits::SyncLimits;


/// Resolved tables ordered by id. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
	tables: Vec<(Arc<str>, Arc<Table>)>,
}

impl SyncSnapshot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn tables(&self) -> &[(Arc<str>, Arc<Table>)] {
		&self.tables
	}

	pub fn get(&self, id: &str) -> Option<&Arc<Table>> {
		self.tables
			.binary_search_by(|(tid, _)| tid.as_ref().cmp(id))
			.ok()
			.map(|idx| &self.tables[idx].1)
	}

	pub fn len(&self) -> usize {
		self.tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	pub fn into_tables(self) -> Vec<(Arc<str>, Arc<Table>)> {
		self.tables
	}
}

/// Collects tables; a repeated id keeps the last table.
impl FromIterator<(Arc<str>, Arc<Table>)> for SyncSnapshot {
	fn from_iter<I: IntoIterator<Item = (Arc<str>, Arc<Table>)>>(iter: I) -> Self {
		let sorted: BTreeMap<Arc<str>, Arc<Table>> = iter.into_iter().collect();
		Self {
			tables: sorted.into_iter().collect(),
		}
	}
}
