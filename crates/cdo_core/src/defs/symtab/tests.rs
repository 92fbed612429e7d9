use super::{GlobalSymbols, RedefinePolicy};
use crate::defs::{ErrorCode, Heap};

#[test]
fn add_entry_keeps_its_own_references() {
	let heap = Heap::new();
	let mut table = GlobalSymbols::default();
	let name = heap.make_str("greet");
	let definition = heap.make_str("hello");

	let result = table.add_entry(&heap, &name, &definition);
	assert!(!result.is_error());
	assert_eq!(name.ref_count(), 2);
	assert_eq!(definition.ref_count(), 2);

	drop((result, name, definition));
	assert_eq!(heap.live_values(), 2);

	let linked = table.lookup(&heap, "greet");
	assert_eq!(linked.as_str(), Some("hello"));
	drop(linked);

	table.clear();
	assert_eq!(heap.live_values(), 0);
}

#[test]
fn replace_policy_releases_previous_definition() {
	let heap = Heap::new();
	let mut table = GlobalSymbols::new(RedefinePolicy::Replace);
	let name = heap.make_str("x");
	let first = heap.make_integer(1);
	let second = heap.make_integer(2);

	assert!(!table.add_entry(&heap, &name, &first).is_error());
	assert!(!table.add_entry(&heap, &name, &second).is_error());
	assert_eq!(first.ref_count(), 1);
	assert_eq!(table.len(), 1);
	assert!(table.get("x").is_some_and(|value| value.ptr_eq(&second)));
}

#[test]
fn reject_policy_leaves_table_unchanged() {
	let heap = Heap::new();
	let mut table = GlobalSymbols::new(RedefinePolicy::Reject);
	let name = heap.make_str("x");
	let first = heap.make_integer(1);
	let second = heap.make_integer(2);

	assert!(!table.add_entry(&heap, &name, &first).is_error());
	let result = table.add_entry(&heap, &name, &second);
	assert_eq!(result.error().map(|err| err.code), Some(ErrorCode::Redefinition));
	assert_eq!(second.ref_count(), 1);
	assert!(table.get("x").is_some_and(|value| value.ptr_eq(&first)));
}

#[test]
fn non_string_names_are_rejected() {
	let heap = Heap::new();
	let mut table = GlobalSymbols::default();
	let name = heap.make_symbol("x");
	let definition = heap.make_nil();

	let result = table.add_entry(&heap, &name, &definition);
	assert_eq!(result.error().map(|err| err.code), Some(ErrorCode::NotString));
	assert!(table.is_empty());
	assert_eq!(definition.ref_count(), 1);
}

#[test]
fn lookup_of_unbound_name_is_error() {
	let heap = Heap::new();
	let table = GlobalSymbols::default();
	let value = table.lookup(&heap, "(boot)");
	assert_eq!(value.error().map(|err| err.code), Some(ErrorCode::UnboundSymbol));
}

#[test]
fn names_are_sorted() {
	let heap = Heap::new();
	let mut table = GlobalSymbols::default();
	for name in ["zeta", "alpha", "mid"] {
		let key = heap.make_str(name);
		let value = heap.make_nil();
		let _ = table.add_entry(&heap, &key, &value);
	}
	assert_eq!(table.names(), vec!["alpha", "mid", "zeta"]);
	assert!(table.contains("mid"));
	assert!(table.name_value("alpha").is_some_and(|value| value.as_str() == Some("alpha")));
}
