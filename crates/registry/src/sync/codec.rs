//! Binary wire format for sync snapshots.
//!
//! # Layout
//!
//! ```text
//! MAGIC (8 bytes) | SCHEMA_VERSION (u32 LE) | postcard payload
//! ```
//!
//! The payload is a postcard-encoded sequence of records. postcard writes
//! sequence and string lengths as LEB128 varints and signed integers as
//! zigzag varints, so each record is laid out as
//! `(id, kind tag, default value, entry count, entries × (id, value))`.
//! Records are emitted sorted by table id and entries sorted by identifier.
//! There is no checksum; the transport is trusted for integrity.

use std::borrow::Cow;
use std::mem::size_of;
use std::sync::Arc;

use datatables_primitives::{IdentifierError, TableKind, validate_identifier};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{SyncLimits, SyncSnapshot};
use crate::error::{SnapshotDecodeError, SnapshotEncodeError};
use crate::table::TableBuilder;

/// Magic bytes identifying a data table sync snapshot.
pub const MAGIC: &[u8; 8] = b"DTBLSYNC";

/// Schema version for snapshot compatibility.
pub const SCHEMA_VERSION: u32 = 1;

/// Total header size in bytes (magic + version).
pub const HEADER_SIZE: usize = MAGIC.len() + size_of::<u32>();

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct WireTable<'a> {
	#[serde(borrow)]
	pub(super) id: Cow<'a, str>,
	pub(super) kind: u8,
	pub(super) default_value: i32,
	#[serde(borrow)]
	pub(super) entries: Vec<WireEntry<'a>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct WireEntry<'a> {
	#[serde(borrow)]
	pub(super) id: Cow<'a, str>,
	pub(super) value: i32,
}

/// Encodes `snapshot` deterministically.
///
/// The snapshot is checked against the same identifier rules and `limits` that
/// [`decode`] enforces, so a peer using equal limits never rejects the output.
pub fn encode(snapshot: &SyncSnapshot, limits: &SyncLimits) -> Result<Vec<u8>, SnapshotEncodeError> {
	check_limit("table count", limits.max_tables, snapshot.len())?;
	let mut payload: Vec<WireTable<'_>> = Vec::with_capacity(snapshot.len());
	for (id, table) in snapshot.tables() {
		check_identifier(id, limits, || "table id".to_string())?;
		let elements = table.elements();
		check_limit("entries per table", limits.max_entries_per_table, elements.len())?;

		let mut entries = Vec::with_capacity(elements.len());
		for (entry, value) in elements {
			check_identifier(entry, limits, || format!("entry of table {id}"))?;
			entries.push(WireEntry {
				id: Cow::Borrowed(entry.as_ref()),
				value,
			});
		}
		payload.push(WireTable {
			id: Cow::Borrowed(id.as_ref()),
			kind: table.kind().wire_tag(),
			default_value: table.default_value(),
			entries,
		});
	}

	let body = postcard::to_stdvec(&payload).map_err(|e| SnapshotEncodeError::Payload(e.to_string()))?;
	let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
	out.extend_from_slice(&body);
	Ok(out)
}

/// Decodes a snapshot, rejecting it whole on any malformed or over-limit content.
///
/// Decoded tables have no group entries and an empty query cache.
pub fn decode(bytes: &[u8], limits: &SyncLimits) -> Result<SyncSnapshot, SnapshotDecodeError> {
	let body = validate_header(bytes)?;
	// The record count leads the payload; refuse oversized snapshots before
	// deserializing any record.
	if let Ok((declared, _)) = postcard::take_from_bytes::<u64>(body) {
		let found = usize::try_from(declared).unwrap_or(usize::MAX);
		check_limit("table count", limits.max_tables, found)?;
	}
	let (records, rest): (Vec<WireTable<'_>>, &[u8]) =
		postcard::take_from_bytes(body).map_err(|e| SnapshotDecodeError::Payload(e.to_string()))?;
	if !rest.is_empty() {
		return Err(SnapshotDecodeError::TrailingBytes(rest.len()));
	}
	check_limit("table count", limits.max_tables, records.len())?;

	let mut seen_tables: FxHashSet<Arc<str>> = FxHashSet::default();
	let mut tables = Vec::with_capacity(records.len());
	for record in records {
		check_identifier(&record.id, limits, || "table id".to_string())?;
		let id: Arc<str> = Arc::from(record.id.as_ref());
		if !seen_tables.insert(Arc::clone(&id)) {
			return Err(SnapshotDecodeError::DuplicateTable(id.to_string()));
		}
		let kind = TableKind::from_wire_tag(record.kind).ok_or_else(|| SnapshotDecodeError::UnknownKind {
			table: id.to_string(),
			tag: record.kind,
		})?;
		check_limit("entries per table", limits.max_entries_per_table, record.entries.len())?;

		let mut builder = TableBuilder::new(kind, record.default_value);
		for entry in record.entries {
			check_identifier(&entry.id, limits, || format!("entry of table {id}"))?;
			if !builder.element_if_absent(Arc::from(entry.id.as_ref()), entry.value) {
				return Err(SnapshotDecodeError::DuplicateEntry {
					table: id.to_string(),
					entry: entry.id.into_owned(),
				});
			}
		}
		tables.push((id, Arc::new(builder.build())));
	}

	Ok(tables.into_iter().collect())
}

fn validate_header(bytes: &[u8]) -> Result<&[u8], SnapshotDecodeError> {
	if bytes.len() < HEADER_SIZE {
		return Err(SnapshotDecodeError::Truncated { len: bytes.len() });
	}
	let (magic, rest) = bytes.split_at(MAGIC.len());
	if magic != MAGIC {
		return Err(SnapshotDecodeError::BadMagic);
	}
	let (version, body) = rest.split_at(size_of::<u32>());
	let found = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
	if found != SCHEMA_VERSION {
		return Err(SnapshotDecodeError::UnsupportedVersion {
			found,
			expected: SCHEMA_VERSION,
		});
	}
	Ok(body)
}

fn check_limit(what: &'static str, limit: usize, found: usize) -> Result<(), SnapshotDecodeError> {
	if found > limit {
		return Err(SnapshotDecodeError::LimitExceeded { what, limit, found });
	}
	Ok(())
}

fn check_identifier(id: &str, limits: &SyncLimits, context: impl FnOnce() -> String) -> Result<(), SnapshotDecodeError> {
	let result = if id.len() > limits.max_identifier_len {
		Err(IdentifierError::TooLong {
			len: id.len(),
			max: limits.max_identifier_len,
		})
	} else {
		validate_identifier(id)
	};
	result.map_err(|source| SnapshotDecodeError::InvalidIdentifier {
		context: context(),
		source,
	})
}
