use std::sync::Arc;

use datatables_primitives::{EntryKey, RawDefinition, TableKind};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::*;
use crate::error::ResolveError;
use crate::groups::StaticGroups;

fn raw_set(defs: impl IntoIterator<Item = RawDefinition>) -> FxHashMap<Arc<str>, RawDefinition> {
	defs.into_iter().map(|def| (Arc::clone(def.id()), def)).collect()
}

fn merged(raw: &FxHashMap<Arc<str>, RawDefinition>, id: &str) -> Arc<ResolvedDefinition> {
	DependencyResolver::new(raw).resolve(id).expect("definition should resolve")
}

fn table<'a>(out: &'a ResolvedTables, id: &str) -> &'a Table {
	&out.tables.iter().find(|(tid, _)| tid.as_ref() == id).expect("table should exist").1
}

fn ids(out: &ResolvedTables) -> Vec<&str> {
	out.tables.iter().map(|(id, _)| id.as_ref()).collect()
}

#[test]
fn no_parents_yields_own_entries() {
	let def = RawDefinition::builder("t").entry("a", 1).group("g", 2).build();
	let raw = raw_set([def.clone()]);
	assert_eq!(merged(&raw, "t").entries, def.entries().clone());
}

#[test]
fn child_overrides_every_parent() {
	let raw = raw_set([
		RawDefinition::builder("b").entry("k", 1).build(),
		RawDefinition::builder("c").entry("k", 2).build(),
		RawDefinition::builder("child").parents(["b", "c"]).entry("k", 3).build(),
	]);
	assert_eq!(merged(&raw, "child").entries.get(&EntryKey::element("k")), Some(&3));
}

#[test]
fn later_parent_wins() {
	let raw = raw_set([
		RawDefinition::builder("b").entry("k", 1).entry("only_b", 10).build(),
		RawDefinition::builder("c").entry("k", 2).build(),
		RawDefinition::builder("child").parents(["b", "c"]).entry("other", 0).build(),
	]);
	let child = merged(&raw, "child");
	assert_eq!(child.entries.get(&EntryKey::element("k")), Some(&2));
	assert_eq!(child.entries.get(&EntryKey::element("only_b")), Some(&10));

	let reversed = raw_set([
		RawDefinition::builder("b").entry("k", 1).build(),
		RawDefinition::builder("c").entry("k", 2).build(),
		RawDefinition::builder("child").parents(["c", "b"]).entry("other", 0).build(),
	]);
	assert_eq!(merged(&reversed, "child").entries.get(&EntryKey::element("k")), Some(&1));
}

#[test]
fn inheritance_is_transitive() {
	let raw = raw_set([
		RawDefinition::builder("root").entry("a", 1).group("g", 5).build(),
		RawDefinition::builder("mid").parent("root").entry("b", 2).build(),
		RawDefinition::builder("leaf").parent("mid").entry("a", 3).build(),
	]);
	let leaf = merged(&raw, "leaf");
	assert_eq!(leaf.entries.get(&EntryKey::element("a")), Some(&3));
	assert_eq!(leaf.entries.get(&EntryKey::element("b")), Some(&2));
	assert_eq!(leaf.entries.get(&EntryKey::group("g")), Some(&5));
}

#[test]
fn kind_and_default_come_from_the_definition_itself() {
	let raw = raw_set([
		RawDefinition::builder("base").kind(TableKind::Block).default_value(4).entry("a", 1).build(),
		RawDefinition::builder("child").parent("base").entry("b", 2).build(),
	]);
	let child = merged(&raw, "child");
	assert_eq!(child.kind, TableKind::Misc);
	assert_eq!(child.default_value, 0);
}

#[test]
fn cycle_fails_members_only() {
	let raw = raw_set([
		RawDefinition::builder("a").parent("b").entry("x", 1).build(),
		RawDefinition::builder("b").parent("a").entry("y", 2).build(),
		RawDefinition::builder("sibling").entry("z", 3).build(),
	]);
	let out = resolve_tables(&raw, &GroupProviders::new());

	assert_eq!(ids(&out), vec!["sibling"]);
	let circular: Vec<&str> = out
		.report
		.problems
		.iter()
		.filter(|p| matches!(p.kind, ProblemKind::Resolve(ResolveError::CircularDependency { .. })))
		.map(|p| p.table.as_ref())
		.collect();
	assert_eq!(circular, vec!["a", "b"]);
	assert_eq!(table(&out, "sibling").query("z"), 3);
}

#[test]
fn cycle_error_lists_path_from_each_member() {
	let raw = raw_set([
		RawDefinition::builder("a").parent("b").entry("x", 1).build(),
		RawDefinition::builder("b").parent("a").entry("y", 2).build(),
	]);
	let mut resolver = DependencyResolver::new(&raw);
	let path = |err: ResolveError| match err {
		ResolveError::CircularDependency { cycle, .. } => cycle.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
		other => panic!("unexpected error {other:?}"),
	};
	assert_eq!(path(resolver.resolve("a").unwrap_err()), vec!["a", "b", "a"]);
	assert_eq!(path(resolver.resolve("b").unwrap_err()), vec!["b", "a", "b"]);
}

#[test]
fn self_parent_is_a_cycle() {
	let raw = raw_set([RawDefinition::builder("a").parent("a").entry("x", 1).build()]);
	let out = resolve_tables(&raw, &GroupProviders::new());
	assert!(out.tables.is_empty());
	assert_eq!(out.report.errors(), 1);
}

#[test]
fn child_of_cycle_keeps_own_entries() {
	let raw = raw_set([
		RawDefinition::builder("a").parent("b").entry("x", 1).build(),
		RawDefinition::builder("b").parent("a").entry("y", 2).build(),
		RawDefinition::builder("child").parent("a").entry("z", 3).build(),
	]);
	let out = resolve_tables(&raw, &GroupProviders::new());
	assert_eq!(ids(&out), vec!["child"]);
	let child = table(&out, "child");
	assert_eq!(child.query("z"), 3);
	assert_eq!(child.query("x"), 0);
	assert!(out.report.problems.iter().any(|p| p.table.as_ref() == "child"
		&& matches!(&p.kind, ProblemKind::Parent { parent, .. } if parent.as_ref() == "a")));
}

#[test]
fn unknown_parent_is_skipped() {
	let raw = raw_set([RawDefinition::builder("t").parent("missing").entry("k", 1).build()]);
	let out = resolve_tables(&raw, &GroupProviders::new());

	assert_eq!(table(&out, "t").query("k"), 1);
	assert_eq!(
		out.report.problems,
		vec![Problem::error(
			Arc::from("t"),
			ProblemKind::Parent {
				parent: Arc::from("missing"),
				error: ResolveError::UnknownDefinition(Arc::from("missing")),
			},
		)]
	);
}

#[test]
fn explicit_entry_beats_group() {
	let raw = raw_set([RawDefinition::builder("t").kind(TableKind::Item).entry("x", 5).group("g", 9).build()]);
	let providers = GroupProviders::new().with(TableKind::Item, StaticGroups::new().with("g", ["x", "y"]));
	let out = resolve_tables(&raw, &providers);

	let t = table(&out, "t");
	assert_eq!(t.query("x"), 5);
	assert_eq!(t.query("y"), 9);
	assert!(out.report.problems.is_empty());
}

#[test]
fn inherited_group_expands_in_child() {
	let raw = raw_set([
		RawDefinition::builder("base").kind(TableKind::Item).group("groupX", 10).build(),
		RawDefinition::builder("child").kind(TableKind::Item).parent("base").entry("itemA", 1).build(),
	]);
	let providers = GroupProviders::new().with(TableKind::Item, StaticGroups::new().with("groupX", ["itemA", "itemB"]));
	let out = resolve_tables(&raw, &providers);

	let child = table(&out, "child");
	assert_eq!(child.query("itemA"), 1);
	assert_eq!(child.query("itemB"), 10);
	assert!(child.contains("itemB"));
}

#[test]
fn overlapping_groups_use_smallest_group_id() {
	let raw = raw_set([RawDefinition::builder("t").kind(TableKind::Block).group("zeta", 2).group("alpha", 1).build()]);
	let providers = GroupProviders::new().with(
		TableKind::Block,
		StaticGroups::new().with("alpha", ["shared", "a_only"]).with("zeta", ["shared", "z_only"]),
	);
	let out = resolve_tables(&raw, &providers);

	let t = table(&out, "t");
	assert_eq!(t.query("shared"), 1);
	assert_eq!(t.query("a_only"), 1);
	assert_eq!(t.query("z_only"), 2);
}

#[test]
fn invalid_group_members_are_skipped_and_reported() {
	let raw = raw_set([RawDefinition::builder("t").kind(TableKind::Item).group("g", 4).build()]);
	let providers = GroupProviders::new().with(TableKind::Item, StaticGroups::new().with("g", ["ok", "has space", "#nested"]));
	let out = resolve_tables(&raw, &providers);

	let t = table(&out, "t");
	assert_eq!(t.query("ok"), 4);
	assert!(!t.contains("has space"));
	assert!(!t.contains("#nested"));

	let skipped: Vec<&str> = out
		.report
		.problems
		.iter()
		.filter_map(|p| match &p.kind {
			ProblemKind::InvalidMember { member, .. } if p.severity == Severity::Error => Some(member.as_ref()),
			_ => None,
		})
		.collect();
	assert_eq!(skipped, vec!["has space", "#nested"]);
}

#[test]
fn unresolved_group_severity_depends_on_kind() {
	let raw = raw_set([
		RawDefinition::builder("misc").group("nothing", 1).build(),
		RawDefinition::builder("blocks").kind(TableKind::Block).group("nothing", 1).build(),
	]);
	let out = resolve_tables(&raw, &GroupProviders::new());

	assert_eq!(ids(&out), vec!["blocks", "misc"]);
	let severity_of = |id: &str| out.report.problems.iter().find(|p| p.table.as_ref() == id).map(|p| p.severity);
	assert_eq!(severity_of("misc"), Some(Severity::Warning));
	assert_eq!(severity_of("blocks"), Some(Severity::Error));
}

#[test]
fn empty_definitions_are_skipped_unless_defaulted() {
	let raw = raw_set([
		RawDefinition::builder("empty").build(),
		RawDefinition::builder("defaulted").default_value(7).build(),
	]);
	let out = resolve_tables(&raw, &GroupProviders::new());

	assert_eq!(ids(&out), vec!["defaulted"]);
	assert_eq!(out.report.skipped, 1);
	assert_eq!(table(&out, "defaulted").query("anything"), 7);
}

#[test]
fn empty_definition_still_serves_as_parent() {
	let raw = raw_set([
		RawDefinition::builder("empty").build(),
		RawDefinition::builder("child").parent("empty").entry("a", 1).build(),
	]);
	let out = resolve_tables(&raw, &GroupProviders::new());
	assert_eq!(ids(&out), vec!["child"]);
	assert!(out.report.problems.is_empty());
}

#[test]
fn shared_parent_is_merged_once() {
	let raw = raw_set([
		RawDefinition::builder("base").entry("a", 1).build(),
		RawDefinition::builder("x").parent("base").entry("b", 2).build(),
		RawDefinition::builder("y").parent("base").entry("c", 3).build(),
	]);
	let mut resolver = DependencyResolver::new(&raw);
	let x = resolver.resolve("x").unwrap();
	let base_first = resolver.resolve("base").unwrap();
	let y = resolver.resolve("y").unwrap();
	assert_eq!(x.entries.get(&EntryKey::element("a")), Some(&1));
	assert_eq!(y.entries.get(&EntryKey::element("a")), Some(&1));
	assert!(Arc::ptr_eq(&base_first, &resolver.resolve("base").unwrap()));
}

mod prop {
	use proptest::prelude::*;

	use super::*;

	proptest! {
		/// Own entries win and, absent an override, the last parent defining a key wins.
		#[test]
		fn override_order(parent_values in proptest::collection::vec(proptest::option::of(-100i32..100), 1..6), own in proptest::option::of(-100i32..100)) {
			let mut defs = Vec::new();
			let mut child = RawDefinition::builder("child").entry("filler", 0);
			for (idx, value) in parent_values.iter().enumerate() {
				let name = format!("p{idx}");
				let mut parent = RawDefinition::builder(name.as_str()).entry("filler", 1);
				if let Some(v) = value {
					parent = parent.entry("k", *v);
				}
				defs.push(parent.build());
				child = child.parent(name.as_str());
			}
			if let Some(v) = own {
				child = child.entry("k", v);
			}
			defs.push(child.build());

			let raw = raw_set(defs);
			let expected = own.or_else(|| parent_values.iter().rev().find_map(|v| *v));
			let resolved = merged(&raw, "child");
			prop_assert_eq!(resolved.entries.get(&EntryKey::element("k")).copied(), expected);
		}
	}
}
