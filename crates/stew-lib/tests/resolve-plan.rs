//! End-to-end resolution and planning over an in-memory forge.

use stew::resolver::{resolve, InstallOrder, TakeFirst};
use stew_test_utils::*;

fn init_logs() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn forge_runtime_chain_resolves_and_orders() {
	init_logs();
	let db = empty_local_db();
	let mut foo = source_pkg("foo", "foo", "1.0");
	foo.depends.push("bar>=1.0".to_string());
	let bar = source_pkg("bar", "bar", "1.0");
	let registry = StaticRegistry::new(vec![foo, bar]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();

	assert_eq!(pool.source.len(), 2);
	assert!(pool.source.contains_key("foo") && pool.source.contains_key("bar"));
	assert!(pool.repo.is_empty());

	let order = InstallOrder::from_pool(&pool);

	assert_eq!(order.base_order, vec!["bar".to_string(), "foo".to_string()]);
	assert!(order.runtime.contains("foo") && order.runtime.contains("bar"));
	assert!(!order.has_make_only());
	assert!(order.get_make_only().is_empty());
}

#[test]
fn build_only_dependency_is_make_only() {
	init_logs();
	let db = empty_local_db();
	let mut foo = source_pkg("foo", "foo", "1.0");
	foo.make_depends.push("bar>=1.0".to_string());
	let bar = source_pkg("bar", "bar", "1.0");
	let registry = StaticRegistry::new(vec![foo, bar]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["foo".to_string()], &db, &registry, &options, &TakeFirst).unwrap();
	let order = InstallOrder::from_pool(&pool);

	/* bar still builds first, but only foo is needed at runtime */
	assert_eq!(order.base_order, vec!["bar".to_string(), "foo".to_string()]);
	assert_eq!(order.runtime.iter().collect::<Vec<_>>(), vec!["foo"]);
	assert!(order.has_make_only());
	assert_eq!(order.get_make_only(), vec!["bar".to_string()]);
}

#[test]
fn runtime_status_survives_runtime_chains_only() {
	/* app -> liba (runtime) -> libb (runtime), app -> tool (make);
	 * tool -> libc (runtime of a make-only package stays make-only) */
	let db = empty_local_db();
	let mut app = source_pkg("app", "app", "1.0");
	app.depends.push("liba".to_string());
	app.make_depends.push("tool".to_string());
	let mut liba = source_pkg("liba", "liba", "1.0");
	liba.depends.push("libb".to_string());
	let libb = source_pkg("libb", "libb", "1.0");
	let mut tool = source_pkg("tool", "tool", "1.0");
	tool.depends.push("libc".to_string());
	let libc = source_pkg("libc", "libc", "1.0");
	let registry = StaticRegistry::new(vec![app, liba, libb, tool, libc]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["app".to_string()], &db, &registry, &options, &TakeFirst).unwrap();
	let order = InstallOrder::from_pool(&pool);

	let mut runtime: Vec<&String> = order.runtime.iter().collect();
	runtime.sort();
	assert_eq!(runtime, vec!["app", "liba", "libb"]);
	assert_eq!(order.get_make_only(), vec!["libc".to_string(), "tool".to_string()]);
}

#[test]
fn split_packages_share_one_base_entry() {
	let db = empty_local_db();
	let mut gui = source_pkg("widget-gui", "widget", "2.0");
	gui.depends.push("widget-core".to_string());
	let core = source_pkg("widget-core", "widget", "2.0");
	let registry = StaticRegistry::new(vec![gui, core]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["widget-gui".to_string()], &db, &registry, &options, &TakeFirst).unwrap();
	let order = InstallOrder::from_pool(&pool);

	assert_eq!(order.base_order, vec!["widget".to_string()]);
	assert_eq!(order.bases["widget"].len(), 2);
	assert_eq!(order.bases["widget"][0].name, "widget-core");
}

#[test]
fn dependency_first_holds_for_every_edge() {
	let db = empty_local_db();
	let mut a = source_pkg("a", "a", "1.0");
	a.depends.push("b".to_string());
	a.make_depends.push("c".to_string());
	let mut b = source_pkg("b", "b", "1.0");
	b.check_depends.push("d".to_string());
	let c = source_pkg("c", "c", "1.0");
	let d = source_pkg("d", "d", "1.0");
	let registry = StaticRegistry::new(vec![a, b, c, d]);
	let options = stew::StewOptions::default();

	let pool = resolve(&["a".to_string()], &db, &registry, &options, &TakeFirst).unwrap();
	let order = InstallOrder::from_pool(&pool);

	let position = |name: &str| order.base_order.iter().position(|base| base == name).unwrap();
	assert!(position("b") < position("a"));
	assert!(position("c") < position("a"));
	assert!(position("d") < position("b"));
}
