//! Data table registry: inheritance resolution, group expansion, and peer sync.
//!
//! A data table maps identifiers to integers with a default fallback. Tables
//! are authored as raw definitions that inherit from parent definitions and
//! reference groups of identifiers; the [`Registry`] resolves them into flat
//! [`Table`]s and can ship the result to a dependent peer as a binary snapshot.
//!
//! # Modules
//!
//! - [`resolve`] - Parent merging with cycle detection, and group expansion
//! - [`groups`] - Group membership providers keyed by table kind
//! - [`source`] - Where raw definitions come from
//! - [`db`] - Registry state machine
//! - [`sync`] - Snapshot type and wire codec
//! - [`lifecycle`] - Host/peer hooks driving a registry
//!
//! # Example
//!
//! ```
//! use datatables_registry::{GroupProviders, MemorySource, RawDefinition, Registry, StaticGroups, TableKind};
//!
//! let source = MemorySource::new([
//! 	RawDefinition::builder("fuel").kind(TableKind::Item).group("logs", 15).entry("coal", 80).build(),
//! ]);
//! let groups = GroupProviders::new().with(TableKind::Item, StaticGroups::new().with("logs", ["oak_log"]));
//!
//! let registry = Registry::new();
//! registry.load(&source);
//! registry.resolve(&groups).unwrap();
//!
//! let fuel = registry.get("fuel");
//! assert_eq!(fuel.query("oak_log"), 15);
//! assert_eq!(fuel.query("stone"), 0);
//! ```

pub mod db;
pub mod error;
pub mod groups;
pub mod lifecycle;
pub mod problem;
pub mod resolve;
pub mod source;
pub mod sync;
pub mod table;

pub use datatables_primitives::{EntryKey, RawDefinition, TableKind};
pub use db::{LoadReport, Registry, RegistryState};
pub use error::{ParseError, RegistryError, ResolveError, SnapshotDecodeError, SnapshotEncodeError, UnresolvedGroupError};
pub use groups::{GroupMembership, GroupProviders, StaticGroups};
pub use lifecycle::Lifecycle;
pub use problem::{Problem, ProblemKind, Severity};
pub use resolve::ResolveReport;
#[cfg(feature = "json")]
pub use source::JsonSource;
pub use source::{DefinitionRecord, DefinitionSource, EmptySource, MemorySource, SourcedDefinition};
pub use sync::{SyncLimits, SyncSnapshot};
pub use table::{Table, TableStats};
