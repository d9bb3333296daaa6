//! Group entry expansion.

use std::sync::Arc;

use datatables_primitives::{IdentifierError, validate_identifier};

use crate::groups::GroupProviders;
use crate::resolve::deps::ResolvedDefinition;
use crate::table::{Table, TableBuilder};

/// A group member the provider returned that is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMember {
	pub group: Arc<str>,
	pub member: Arc<str>,
	pub error: IdentifierError,
}

/// A built table plus the group ids its provider did not know and the
/// members it skipped.
#[derive(Debug)]
pub struct Expansion {
	pub table: Table,
	pub unresolved: Vec<Arc<str>>,
	pub invalid: Vec<InvalidMember>,
}

/// Splits merged entries into element and group entries and expands the groups.
///
/// Groups are applied in ascending group id order with insert-if-absent
/// semantics: explicit element entries are never overwritten, and an
/// identifier reached through several groups takes the value of the
/// lexicographically smallest group id.
pub fn expand(def: &ResolvedDefinition, providers: &GroupProviders) -> Expansion {
	let mut builder = TableBuilder::new(def.kind, def.default_value);
	let mut groups: Vec<(&Arc<str>, i32)> = Vec::new();

	for (key, &value) in &def.entries {
		if key.is_group() {
			groups.push((key.id_arc(), value));
		} else {
			builder.element(Arc::clone(key.id_arc()), value);
		}
	}
	groups.sort_unstable_by(|a, b| a.0.cmp(b.0));

	let provider = providers.get(def.kind);
	let mut unresolved = Vec::new();
	let mut invalid = Vec::new();
	for (group, value) in groups {
		builder.group(Arc::clone(group), value);
		match provider.and_then(|p| p.members(group)) {
			Some(members) => {
				for member in members {
					match validate_identifier(&member) {
						Ok(()) => {
							builder.element_if_absent(member, value);
						}
						Err(error) => invalid.push(InvalidMember {
							group: Arc::clone(group),
							member,
							error,
						}),
					}
				}
			}
			None => unresolved.push(Arc::clone(group)),
		}
	}

	Expansion {
		table: builder.build(),
		unresolved,
		invalid,
	}
}
