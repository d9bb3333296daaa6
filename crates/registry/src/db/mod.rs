//! The data table registry.
//!
//! # Purpose
//!
//! Own one generation of resolved tables and the state machine that produces
//! them:
//!
//! ```text
//! Empty --load--> Loaded --resolve--> Resolved --load--> Empty -> Loaded
//! any --apply_snapshot--> Resolved
//! ```
//!
//! # Mental model
//!
//! - **Writers** (`load`, `resolve`, `apply_snapshot`) serialize on one mutex that
//!   also guards the raw definitions of the current load cycle.
//! - **Readers** (`get`, `contains`, `table_ids`, ...) load the published state
//!   through an [`ArcSwap`] and never block. A transition becomes visible to
//!   readers at the moment its state is stored.
//!
//! # Invariants
//!
//! - Tables are only visible in the `Resolved` state.
//!   - Enforced in: [`Registry::load`] (publishes `Empty` before reading the source).
//!   - Tested by: `tests::reload_clears_tables`.
//!   - Failure symptom: queries during a reload see a previous generation.
//!
//! - A rejected operation leaves the published state untouched.
//!   - Enforced in: [`Registry::resolve`] (state check before any mutation).
//!   - Tested by: `tests::resolve_requires_loaded`.
//!   - Failure symptom: a double resolve wipes the resolved tables.
//!
//! - Lookups never fail; absent or premature lookups return [`Table::dummy`].
//!   - Enforced in: [`Registry::get`].
//!   - Tested by: `tests::get_before_resolve_returns_dummy`.
//!   - Failure symptom: call sites panic or observe `None` during startup.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use datatables_primitives::RawDefinition;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::RegistryError;
use crate::groups::GroupProviders;
use crate::problem::{self, Problem, ProblemKind, Severity};
use crate::resolve::{ResolveReport, ResolvedTables, resolve_tables};
use crate::source::DefinitionSource;
use crate::sync::SyncSnapshot;
use crate::table::Table;


/// Lifecycle state of a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RegistryState {
	#[default]
	Empty,
	/// Raw definitions are held; no tables yet.
	Loaded,
	/// Tables are queryable.
	Resolved,
}

/// Outcome of [`Registry::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
	/// Definitions held after the load.
	pub loaded: usize,
	pub problems: Vec<Problem>,
}

impl LoadReport {
	pub fn errors(&self) -> usize {
		problem::count(&self.problems, Severity::Error)
	}

	pub fn warnings(&self) -> usize {
		problem::count(&self.problems, Severity::Warning)
	}
}

#[derive(Default)]
struct Published {
	state: RegistryState,
	tables: FxHashMap<Arc<str>, Arc<Table>>,
}

impl Published {
	fn state(state: RegistryState) -> Arc<Self> {
		Arc::new(Self {
			state,
			tables: FxHashMap::default(),
		})
	}
}

/// Registry of data tables for one load/sync generation.
pub struct Registry {
	raw: Mutex<FxHashMap<Arc<str>, RawDefinition>>,
	published: ArcSwap<Published>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	pub fn new() -> Self {
		Self {
			raw: Mutex::new(FxHashMap::default()),
			published: ArcSwap::from_pointee(Published::default()),
		}
	}

	/// Replaces all state with the definitions supplied by `source`.
	///
	/// Records that fail to parse are reported and omitted. A repeated id keeps
	/// the later record.
	pub fn load(&self, source: &dyn DefinitionSource) -> LoadReport {
		let mut raw = self.raw.lock();
		raw.clear();
		self.published.store(Published::state(RegistryState::Empty));

		let mut problems = Vec::new();
		for sourced in source.definitions() {
			match sourced.result {
				Ok(def) => {
					let id = Arc::clone(def.id());
					if raw.insert(Arc::clone(&id), def).is_some() {
						problems.push(Problem::warning(id, ProblemKind::Duplicate));
					}
				}
				Err(error) => problems.push(Problem::error(sourced.id, ProblemKind::Parse(error))),
			}
		}
		for problem in &problems {
			problem.emit();
		}

		self.published.store(Published::state(RegistryState::Loaded));
		tracing::info!(
			domain = "datatables",
			loaded = raw.len(),
			problems = problems.len(),
			"data table definitions loaded",
		);
		LoadReport {
			loaded: raw.len(),
			problems,
		}
	}

	/// Resolves the loaded definitions into tables and publishes them.
	///
	/// Per-table failures are reported and never abort the pass. Fails without
	/// side effects unless the registry is [`RegistryState::Loaded`].
	pub fn resolve(&self, providers: &GroupProviders) -> Result<ResolveReport, RegistryError> {
		let mut raw = self.raw.lock();
		let state = self.state();
		if state != RegistryState::Loaded {
			return Err(RegistryError::NotLoaded { state });
		}

		let ResolvedTables { tables, report } = resolve_tables(&raw, providers);
		for problem in &report.problems {
			problem.emit();
		}
		raw.clear();

		self.published.store(Arc::new(Published {
			state: RegistryState::Resolved,
			tables: tables.into_iter().map(|(id, table)| (id, Arc::new(table))).collect(),
		}));
		tracing::info!(
			domain = "datatables",
			resolved = report.resolved,
			skipped = report.skipped,
			errors = report.errors(),
			warnings = report.warnings(),
			"data tables resolved",
		);
		Ok(report)
	}

	/// Installs pre-resolved tables from an authoritative peer, from any state.
	///
	/// Returns the number of tables installed.
	pub fn apply_snapshot(&self, snapshot: SyncSnapshot) -> usize {
		let mut raw = self.raw.lock();
		raw.clear();

		let tables: FxHashMap<_, _> = snapshot.into_tables().into_iter().collect();
		let count = tables.len();
		self.published.store(Arc::new(Published {
			state: RegistryState::Resolved,
			tables,
		}));
		tracing::info!(domain = "datatables", tables = count, "data table snapshot applied");
		count
	}

	/// Returns the table for `id`, or [`Table::dummy`] if it is absent or the
	/// registry is not resolved.
	pub fn get(&self, id: &str) -> Arc<Table> {
		let published = self.published.load();
		if published.state != RegistryState::Resolved {
			tracing::warn!(
				domain = "datatables",
				table = %id,
				state = %published.state,
				"data table queried before resolution",
			);
			return Table::dummy();
		}
		match published.tables.get(id) {
			Some(table) => Arc::clone(table),
			None => {
				tracing::debug!(domain = "datatables", table = %id, "unknown data table");
				Table::dummy()
			}
		}
	}

	/// Returns the table for `id` without the dummy fallback.
	pub fn get_optional(&self, id: &str) -> Option<Arc<Table>> {
		self.published.load().tables.get(id).cloned()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.published.load().tables.contains_key(id)
	}

	/// Resolved table ids in ascending order.
	pub fn table_ids(&self) -> Vec<Arc<str>> {
		let mut ids: Vec<_> = self.published.load().tables.keys().cloned().collect();
		ids.sort_unstable();
		ids
	}

	pub fn state(&self) -> RegistryState {
		self.published.load().state
	}

	pub fn is_resolved(&self) -> bool {
		self.state() == RegistryState::Resolved
	}

	/// Number of resolved tables.
	pub fn len(&self) -> usize {
		self.published.load().tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Captures the resolved tables for transmission.
	pub fn create_snapshot(&self) -> Result<SyncSnapshot, RegistryError> {
		let published = self.published.load_full();
		if published.state != RegistryState::Resolved {
			return Err(RegistryError::NotResolved { state: published.state });
		}
		Ok(published
			.tables
			.iter()
			.map(|(id, table)| (Arc::clone(id), Arc::clone(table)))
			.collect())
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let published = self.published.load();
		f.debug_struct("Registry")
			.field("state", &published.state)
			.field("tables", &published.tables.len())
			.finish_non_exhaustive()
	}
}
