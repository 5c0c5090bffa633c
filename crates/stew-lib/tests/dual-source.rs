//! Rules at the boundary between the sync repos and the forge.

use stew::forge::SourcePackage;
use stew::resolver::{resolve, ProviderPicker, TakeFirst};
use stew_test_utils::*;

#[test]
fn sync_repo_wins_for_unhinted_targets_and_deps() {
	let db = stew::LocalDb::new(
		Vec::new(),
		vec![sync_repo("core", vec![repo_pkg("bar", "1.0", "core", &[], &[])], &[])],
	);
	let mut foo = source_pkg("foo", "foo", "1.0");
	foo.depends.push("bar".to_string());
	/* the forge also offers bar; the sync repo must still win */
	let registry = StaticRegistry::new(vec![foo, source_pkg("bar", "bar", "2.0")]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert!(pool.source.contains_key("foo"));
	assert!(pool.repo.contains_key("bar"));
	assert!(!pool.source.contains_key("bar"));
}

#[test]
fn forge_hint_bypasses_the_sync_repos() {
	let db = stew::LocalDb::new(
		Vec::new(),
		vec![sync_repo("core", vec![repo_pkg("foo", "1.0", "core", &[], &[])], &[])],
	);
	let registry = StaticRegistry::new(vec![source_pkg("foo", "foo", "2.0")]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["forge/foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert!(pool.source.contains_key("foo"));
	assert!(pool.repo.is_empty());
}

#[test]
fn installed_dependencies_are_not_reresolved() {
	let db = stew::LocalDb::new(
		vec![repo_pkg("bar", "1.0", "", &[], &[])],
		Vec::new(),
	);
	let mut foo = source_pkg("foo", "foo", "1.0");
	foo.depends.push("bar".to_string());
	let registry = StaticRegistry::new(vec![foo, source_pkg("bar", "bar", "1.0")]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.source.len(), 1);
	assert!(pool.repo.is_empty());
}

#[test]
fn sync_repo_chains_never_fall_through_to_the_forge() {
	/* vim needs libghost which only the forge has; resolving the *repo*
	 * package must not fetch it, the missing report carries it instead */
	let db = stew::LocalDb::new(
		Vec::new(),
		vec![sync_repo("core", vec![repo_pkg("vim", "9.0", "core", &[], &["libghost"])], &[])],
	);
	let registry = StaticRegistry::new(vec![source_pkg("libghost", "libghost", "1.0")]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["vim".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert!(pool.repo.contains_key("vim"));
	assert!(pool.source.is_empty());
	assert_eq!(registry.info_calls(), 0);

	let missing = pool.check_missing();
	assert!(missing.missing.contains_key("libghost"));
}

#[test]
fn unknown_named_repo_is_a_configuration_error() {
	let db = empty_local_db();
	let registry = StaticRegistry::new(Vec::new());
	let options = stew::StewOptions::default();

	let result = resolve(&["nosuch/foo".to_string()], &db, &registry, &options, &TakeFirst);

	assert!(matches!(result, Err(stew::Error::NoSuchRepo(name)) if name == "nosuch"));
}

#[test]
fn group_targets_are_recorded_but_never_expanded() {
	let db = stew::LocalDb::new(
		Vec::new(),
		vec![sync_repo("extra", vec![repo_pkg("vim", "9.0", "extra", &[], &[])], &["editors"])],
	);
	let registry = StaticRegistry::new(Vec::new());
	let options = stew::StewOptions::default();

	let pool = resolve(&["editors".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.groups, vec!["editors".to_string()]);
	assert!(pool.repo.is_empty() && pool.source.is_empty());
	assert!(pool.has_package("editors"));
}

#[test]
fn batched_fetches_scale_with_depth_not_breadth() {
	let db = empty_local_db();
	let mut foo = source_pkg("foo", "foo", "1.0");
	foo.depends.push("bar".to_string());
	foo.make_depends.push("baz".to_string());
	let registry = StaticRegistry::new(vec![
		foo,
		source_pkg("bar", "bar", "1.0"),
		source_pkg("baz", "baz", "1.0"),
	]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.source.len(), 3);
	/* one call for foo, one for {bar, baz} together */
	assert_eq!(registry.info_calls(), 2);
}

#[test]
fn provides_cycles_resolve_each_name_once() {
	let mut a = source_pkg("a", "a", "1.0");
	a.provides.push("x".to_string());
	a.depends.push("b".to_string());
	let mut b = source_pkg("b", "b", "1.0");
	b.depends.push("x".to_string());
	let db = empty_local_db();
	let registry = StaticRegistry::new(vec![a, b]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["a".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.source.len(), 2);
	assert!(pool.source.contains_key("a") && pool.source.contains_key("b"));
}

#[test]
fn already_satisfied_targets_are_skipped_in_order() {
	let db = empty_local_db();
	let registry = StaticRegistry::new(vec![source_pkg("foo", "foo", "2.0")]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string(), "foo>=1.0".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.source.len(), 1);
	assert_eq!(pool.targets.len(), 2);
}

struct PickLast;

impl ProviderPicker for PickLast {
	fn pick(&self, _dep: &str, candidates: &[&SourcePackage]) -> usize {
		candidates.len() - 1
	}
}

fn provider_fixture() -> (stew::LocalDb, StaticRegistry) {
	let mut a = source_pkg("java-a", "java-a", "1.0");
	a.provides.push("java-env".to_string());
	let mut b = source_pkg("java-b", "java-b", "1.0");
	b.provides.push("java-env".to_string());
	(empty_local_db(), StaticRegistry::new(vec![a, b]))
}

#[test]
fn provide_discovery_finds_providers_and_defaults_to_first() {
	let (db, registry) = provider_fixture();
	let mut options = stew::StewOptions::default();
	options.set_discover_provides(true);

	let pool = resolve(&["java-env".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert!(registry.search_calls() >= 1);
	assert!(pool.source.contains_key("java-a"));
	assert!(!pool.source.contains_key("java-b"));
}

#[test]
fn provider_ambiguity_is_settled_by_the_picker() {
	let (db, registry) = provider_fixture();
	let mut options = stew::StewOptions::default();
	options.set_discover_provides(true);

	let pool = resolve(&["java-env".to_string()], &db, &registry, &options, &PickLast).unwrap();

	assert!(pool.source.contains_key("java-b"));
}

#[test]
fn discovery_disabled_means_no_searches() {
	let (db, registry) = provider_fixture();
	let options = stew::StewOptions::default();

	let pool = resolve(&["java-env".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(registry.search_calls(), 0);
	assert!(pool.source.is_empty());
}
