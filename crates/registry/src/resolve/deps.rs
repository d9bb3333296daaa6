//! Parent-chain merging with cycle detection.

use std::sync::Arc;

use datatables_primitives::{EntryKey, RawDefinition, TableKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ResolveError;
use crate::problem::{Problem, ProblemKind};

/// A definition with its inherited entries merged in.
///
/// Exists only during a resolve pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefinition {
	pub id: Arc<str>,
	pub kind: TableKind,
	pub default_value: i32,
	pub entries: FxHashMap<EntryKey, i32>,
}

/// Accumulates inherited entries, then lets the definition's own entries win outright.
#[derive(Debug, Default)]
pub struct MergeBuilder {
	entries: FxHashMap<EntryKey, i32>,
}

impl MergeBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merges a parent's entries; a later parent overwrites an earlier one on collision.
	pub fn inherit(&mut self, parent: &ResolvedDefinition) -> &mut Self {
		self.entries
			.extend(parent.entries.iter().map(|(key, &value)| (key.clone(), value)));
		self
	}

	pub fn finish(mut self, own: &RawDefinition) -> ResolvedDefinition {
		self.entries
			.extend(own.entries().iter().map(|(key, &value)| (key.clone(), value)));
		ResolvedDefinition {
			id: Arc::clone(own.id()),
			kind: own.kind(),
			default_value: own.default_value(),
			entries: self.entries,
		}
	}
}

/// Depth-first memoized resolver over one set of raw definitions.
///
/// Successes and failures are both memoized for the lifetime of the resolver,
/// so each definition is merged at most once per pass.
pub struct DependencyResolver<'a> {
	raw: &'a FxHashMap<Arc<str>, RawDefinition>,
	resolved: FxHashMap<Arc<str>, Arc<ResolvedDefinition>>,
	failed: FxHashMap<Arc<str>, ResolveError>,
	stack: Vec<Arc<str>>,
	in_progress: FxHashSet<Arc<str>>,
	cyclic: FxHashSet<Arc<str>>,
	cycles: Vec<Vec<Arc<str>>>,
	problems: Vec<Problem>,
}

impl<'a> DependencyResolver<'a> {
	pub fn new(raw: &'a FxHashMap<Arc<str>, RawDefinition>) -> Self {
		Self {
			raw,
			resolved: FxHashMap::default(),
			failed: FxHashMap::default(),
			stack: Vec::new(),
			in_progress: FxHashSet::default(),
			cyclic: FxHashSet::default(),
			cycles: Vec::new(),
			problems: Vec::new(),
		}
	}

	/// Resolves `id` and, recursively, its parents.
	///
	/// Parent failures are recorded as [`ProblemKind::Parent`] problems against
	/// the child and do not fail it. The child fails only if it is itself
	/// unknown or lies on a parent cycle; every member of a detected cycle fails.
	pub fn resolve(&mut self, id: &str) -> Result<Arc<ResolvedDefinition>, ResolveError> {
		if let Some(done) = self.resolved.get(id) {
			return Ok(Arc::clone(done));
		}
		if let Some(err) = self.failed.get(id) {
			return Err(err.clone());
		}
		if self.in_progress.contains(id) {
			return Err(self.mark_cycle(id));
		}

		let raw = self.raw;
		let Some(def) = raw.get(id) else {
			return Err(ResolveError::UnknownDefinition(Arc::from(id)));
		};
		let id = Arc::clone(def.id());

		self.in_progress.insert(Arc::clone(&id));
		self.stack.push(Arc::clone(&id));

		let mut merged = MergeBuilder::new();
		let mut parent_problems = Vec::new();
		for parent in def.parents() {
			match self.resolve(parent) {
				Ok(resolved) => {
					merged.inherit(&resolved);
				}
				Err(error) => parent_problems.push(Problem::error(
					Arc::clone(&id),
					ProblemKind::Parent {
						parent: Arc::clone(parent),
						error,
					},
				)),
			}
		}

		self.stack.pop();
		self.in_progress.remove(&id);

		if self.cyclic.contains(&id) {
			let err = ResolveError::CircularDependency {
				cycle: self.cycle_for(&id),
				id: Arc::clone(&id),
			};
			self.failed.insert(id, err.clone());
			return Err(err);
		}

		self.problems.extend(parent_problems);
		let resolved = Arc::new(merged.finish(def));
		self.resolved.insert(id, Arc::clone(&resolved));
		Ok(resolved)
	}

	/// Marks every id on the stack from `id` upward as a cycle member.
	fn mark_cycle(&mut self, id: &str) -> ResolveError {
		let start = self.stack.iter().rposition(|s| s.as_ref() == id).unwrap_or(0);
		let members: Vec<Arc<str>> = self.stack[start..].to_vec();
		self.cyclic.extend(members.iter().cloned());
		let mut cycle = members;
		if let Some(first) = cycle.first().cloned() {
			cycle.push(first);
		}
		self.cycles.push(cycle.clone());
		ResolveError::CircularDependency {
			id: Arc::from(id),
			cycle,
		}
	}

	/// The recorded cycle through `id`, rotated to start and end at `id`.
	fn cycle_for(&self, id: &Arc<str>) -> Vec<Arc<str>> {
		let Some(cycle) = self.cycles.iter().find(|cycle| cycle.contains(id)) else {
			return vec![Arc::clone(id), Arc::clone(id)];
		};
		let ring = &cycle[..cycle.len() - 1];
		let start = ring.iter().position(|member| member == id).unwrap_or(0);
		let mut rotated: Vec<Arc<str>> = ring[start..].iter().chain(&ring[..start]).cloned().collect();
		rotated.push(Arc::clone(id));
		rotated
	}

	/// Problems recorded against successfully resolved definitions.
	pub fn take_problems(&mut self) -> Vec<Problem> {
		std::mem::take(&mut self.problems)
	}
}
