//! Resolution of raw definitions into query-ready tables.
//!
//! # Purpose
//!
//! Turn the raw definitions of one load cycle into flat [`Table`]s: merge each
//! definition with its parent chain, then expand its group entries into
//! element entries.
//!
//! # Mental model
//!
//! 1. **Merge:** [`DependencyResolver`] walks parents depth-first in declared
//!    order. Inherited entries are layered left to right, then the definition's
//!    own entries overwrite everything inherited.
//! 2. **Expand:** [`expand`] asks the kind's [`GroupMembership`] provider for
//!    each group and fills in members that have no explicit element entry.
//! 3. **Report:** every failure becomes a [`Problem`] against one table; no
//!    failure stops the pass.
//!
//! # Invariants
//!
//! - Own entries win over inherited entries; later parents win over earlier ones.
//!   - Enforced in: [`MergeBuilder::finish`], [`MergeBuilder::inherit`].
//!   - Tested by: `tests::child_overrides_every_parent`, `tests::later_parent_wins`.
//!   - Failure symptom: inherited value shadows an override.
//!
//! - Explicit element entries are never overwritten by group expansion.
//!   - Enforced in: [`expand`] (insert-if-absent).
//!   - Tested by: `tests::explicit_entry_beats_group`.
//!   - Failure symptom: group value replaces a hand-written value.
//!
//! - Resolution terminates on cyclic graphs and fails every cycle member.
//!   - Enforced in: [`DependencyResolver::resolve`] (in-progress stack).
//!   - Tested by: `tests::cycle_fails_members_only`.
//!   - Failure symptom: stack overflow, or a cyclic table silently resolving.
//!
//! - Output is deterministic: ids resolve in ascending order and groups apply in
//!   ascending group id order.
//!   - Enforced in: [`resolve_tables`], [`expand`].
//!   - Tested by: `tests::overlapping_groups_use_smallest_group_id`.
//!   - Failure symptom: the same inputs produce different tables across runs.
//!
//! [`GroupMembership`]: crate::groups::GroupMembership

use std::sync::Arc;

use datatables_primitives::{DEFAULT_VALUE, RawDefinition};
use rustc_hash::FxHashMap;

use crate::error::UnresolvedGroupError;
use crate::groups::GroupProviders;
use crate::problem::{self, Problem, ProblemKind, Severity};
use crate::table::Table;

mod deps;
mod expand;

pub use deps::{DependencyResolver, MergeBuilder, ResolvedDefinition};
pub use expand::{Expansion, InvalidMember, expand};

#[cfg(test)]
mod tests;

/// Outcome of one resolve pass, without the tables themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
	/// Tables produced.
	pub resolved: usize,
	/// Definitions skipped for being empty.
	pub skipped: usize,
	pub problems: Vec<Problem>,
}

impl ResolveReport {
	pub fn errors(&self) -> usize {
		problem::count(&self.problems, Severity::Error)
	}

	pub fn warnings(&self) -> usize {
		problem::count(&self.problems, Severity::Warning)
	}

	pub fn has_errors(&self) -> bool {
		self.errors() > 0
	}
}

/// Tables produced by [`resolve_tables`], sorted by id.
#[derive(Debug, Default)]
pub struct ResolvedTables {
	pub tables: Vec<(Arc<str>, Table)>,
	pub report: ResolveReport,
}

/// Returns true for a definition that would resolve to a table
/// indistinguishable from the dummy: no own entries and the zero default.
fn is_empty(def: &RawDefinition) -> bool {
	def.entries().is_empty() && def.default_value() == DEFAULT_VALUE
}

/// Resolves every raw definition into a table.
pub fn resolve_tables(raw: &FxHashMap<Arc<str>, RawDefinition>, providers: &GroupProviders) -> ResolvedTables {
	let mut ids: Vec<&Arc<str>> = raw.keys().collect();
	ids.sort_unstable();

	let mut resolver = DependencyResolver::new(raw);
	let mut merged = Vec::with_capacity(ids.len());
	let mut problems = Vec::new();
	let mut skipped = 0;

	for id in ids {
		if is_empty(&raw[id]) {
			tracing::debug!(domain = "datatables", table = %id, "skipping empty definition");
			skipped += 1;
			continue;
		}
		match resolver.resolve(id) {
			Ok(def) => merged.push(def),
			Err(error) => problems.push(Problem::error(Arc::clone(id), ProblemKind::Resolve(error))),
		}
	}
	problems.extend(resolver.take_problems());

	let mut tables = Vec::with_capacity(merged.len());
	for def in merged {
		let Expansion { table, unresolved, invalid } = expand(&def, providers);
		for InvalidMember { group, member, error } in invalid {
			let kind = ProblemKind::InvalidMember { group, member, error };
			problems.push(Problem::error(Arc::clone(&def.id), kind));
		}
		for group in unresolved {
			let kind = ProblemKind::UnresolvedGroup(UnresolvedGroupError { group, kind: def.kind });
			problems.push(if def.kind.is_generic() {
				Problem::warning(Arc::clone(&def.id), kind)
			} else {
				Problem::error(Arc::clone(&def.id), kind)
			});
		}
		tables.push((Arc::clone(&def.id), table));
	}

	ResolvedTables {
		report: ResolveReport {
			resolved: tables.len(),
			skipped,
			problems,
		},
		tables,
	}
}
