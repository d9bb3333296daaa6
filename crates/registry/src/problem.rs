//! Per-definition diagnostics collected while loading and resolving.
//!
//! Problems never abort a load or resolve pass. Each one names the table it
//! concerns, and is logged once by the registry at its [`Severity`].

use std::fmt;
use std::sync::Arc;

use datatables_primitives::IdentifierError;

use crate::error::{ParseError, ResolveError, UnresolvedGroupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
	Warning,
	Error,
}

/// What went wrong for one table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemKind {
	/// The record was skipped.
	#[error(transparent)]
	Parse(ParseError),
	/// The same id was supplied twice; the later record replaced the earlier one.
	#[error("duplicate definition; the later record wins")]
	Duplicate,
	/// The table itself failed to resolve and was omitted.
	#[error(transparent)]
	Resolve(ResolveError),
	/// One parent failed to resolve; its contribution was skipped.
	#[error("parent {parent} skipped: {error}")]
	Parent { parent: Arc<str>, error: ResolveError },
	/// A group entry could not be expanded.
	#[error(transparent)]
	UnresolvedGroup(UnresolvedGroupError),
	/// A group member is not a valid identifier and was left out of the table.
	#[error("member {member:?} of group #{group} skipped: {error}")]
	InvalidMember {
		group: Arc<str>,
		member: Arc<str>,
		error: IdentifierError,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
	pub table: Arc<str>,
	pub kind: ProblemKind,
	pub severity: Severity,
}

impl Problem {
	pub fn error(table: Arc<str>, kind: ProblemKind) -> Self {
		Self {
			table,
			kind,
			severity: Severity::Error,
		}
	}

	pub fn warning(table: Arc<str>, kind: ProblemKind) -> Self {
		Self {
			table,
			kind,
			severity: Severity::Warning,
		}
	}

	pub(crate) fn emit(&self) {
		match self.severity {
			Severity::Warning => tracing::warn!(
				domain = "datatables",
				table = %self.table,
				problem = %self.kind,
				"data table problem",
			),
			Severity::Error => tracing::error!(
				domain = "datatables",
				table = %self.table,
				problem = %self.kind,
				"data table problem",
			),
		}
	}
}

impl fmt::Display for Problem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let level = match self.severity {
			Severity::Warning => "warning",
			Severity::Error => "error",
		};
		write!(f, "{level}: {}: {}", self.table, self.kind)
	}
}

pub(crate) fn count(problems: &[Problem], severity: Severity) -> usize {
	problems.iter().filter(|p| p.severity == severity).count()
}
