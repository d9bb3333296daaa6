//! Core types for data tables: identifiers, entry keys, table kinds, and raw definitions.

/// Raw (unresolved) table definitions and their builder.
pub mod def;
/// Identifier validation.
pub mod ident;
/// Entry keys distinguishing element references from group references.
pub mod key;
/// Closed set of table kinds.
pub mod kind;

pub use def::{DEFAULT_VALUE, RawDefinition, RawDefinitionBuilder};
pub use ident::{GROUP_MARKER, IdentifierError, validate_identifier};
pub use key::EntryKey;
pub use kind::TableKind;
