use serde::{Deserialize, Serialize};

/// Upper bounds on snapshot content, enforced by both [`encode`] and [`decode`].
///
/// `max_tables` is checked against the declared record count before any record
/// is deserialized. `max_entries_per_table` and `max_identifier_len` are
/// checked after the payload is parsed, so they bound what a peer accepts, not
/// the parsing work. Parsing memory still grows only with the input length,
/// since serde caps sequence preallocation regardless of declared counts.
///
/// [`encode`]: super::encode
/// [`decode`]: super::decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncLimits {
	pub max_tables: usize,
	pub max_entries_per_table: usize,
	/// Maximum identifier length in bytes.
	pub max_identifier_len: usize,
}

impl SyncLimits {
	pub const fn defaults() -> Self {
		Self {
			max_tables: 4096,
			max_entries_per_table: 65_536,
			max_identifier_len: 256,
		}
	}

	pub const fn unlimited() -> Self {
		Self {
			max_tables: usize::MAX,
			max_entries_per_table: usize::MAX,
			max_identifier_len: usize::MAX,
		}
	}
}

impl Default for SyncLimits {
	fn default() -> Self {
		Self::defaults()
	}
}
