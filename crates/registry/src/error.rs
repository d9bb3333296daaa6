use std::sync::Arc;

use datatables_primitives::{IdentifierError, TableKind};

use crate::db::RegistryState;

/// A definition record could not be turned into a raw definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("malformed record: {0}")]
	Syntax(String),
	#[error("invalid table id: {0}")]
	TableId(#[source] IdentifierError),
	#[error("invalid parent {parent:?}: {source}")]
	Parent { parent: String, source: IdentifierError },
	#[error("invalid entry key {key:?}: {source}")]
	EntryKey { key: String, source: IdentifierError },
}

/// Failure to resolve one definition's inheritance chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// A referenced parent has no definition.
	#[error("unknown definition {0}")]
	UnknownDefinition(Arc<str>),
	/// The definition sits on a parent cycle; `cycle` lists the path, closed by its first id.
	#[error("circular dependency at {id}: {}", join_cycle(cycle))]
	CircularDependency { id: Arc<str>, cycle: Vec<Arc<str>> },
}

fn join_cycle(cycle: &[Arc<str>]) -> String {
	cycle.iter().map(|id| id.as_ref()).collect::<Vec<_>>().join(" -> ")
}

/// A group entry whose group the membership provider does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unresolved group #{group} for {kind} table")]
pub struct UnresolvedGroupError {
	pub group: Arc<str>,
	pub kind: TableKind,
}

/// A sync snapshot was rejected. The receiving registry is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotDecodeError {
	#[error("snapshot is {len} bytes, shorter than its header")]
	Truncated { len: usize },
	#[error("snapshot magic mismatch")]
	BadMagic,
	#[error("unsupported snapshot schema version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },
	#[error("malformed snapshot payload: {0}")]
	Payload(String),
	#[error("{0} trailing bytes after snapshot payload")]
	TrailingBytes(usize),
	#[error("table {table}: unknown kind tag {tag}")]
	UnknownKind { table: String, tag: u8 },
	#[error("invalid identifier in {context}: {source}")]
	InvalidIdentifier {
		context: String,
		source: IdentifierError,
	},
	#[error("duplicate table {0}")]
	DuplicateTable(String),
	#[error("table {table}: duplicate entry {entry}")]
	DuplicateEntry { table: String, entry: String },
	#[error("{what} limit exceeded: {found} > {limit}")]
	LimitExceeded {
		what: &'static str,
		limit: usize,
		found: usize,
	},
}

/// A snapshot could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotEncodeError {
	#[error("snapshot encoding failed: {0}")]
	Payload(String),
	/// The tables break a rule a receiving peer enforces.
	#[error("snapshot would be rejected by peers: {0}")]
	Unsendable(#[from] SnapshotDecodeError),
}

/// Registry lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("registry is {state}; resolve requires loaded definitions")]
	NotLoaded { state: RegistryState },
	#[error("registry is {state}; tables are not resolved")]
	NotResolved { state: RegistryState },
	#[error("snapshot rejected: {0}")]
	Decode(#[from] SnapshotDecodeError),
	#[error(transparent)]
	Encode(#[from] SnapshotEncodeError),
}
