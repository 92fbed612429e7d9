use crate::defs::{ErrorCode, Heap, ValueKind};

#[test]
fn live_count_tracks_cells_not_references() {
	let heap = Heap::new();
	let value = heap.make_str("hello");
	let extra = value.retain();
	assert_eq!(heap.live_values(), 1);
	assert_eq!(value.ref_count(), 2);

	drop(value);
	assert_eq!(heap.live_values(), 1);
	assert_eq!(extra.ref_count(), 1);

	drop(extra);
	assert_eq!(heap.live_values(), 0);
	assert_eq!(heap.total_allocated(), 1);
}

#[test]
fn list_release_frees_children() {
	let heap = Heap::new();
	let list = heap.make_list(vec![heap.make_integer(1), heap.make_str("two"), heap.make_nil()]);
	assert_eq!(heap.live_values(), 4);
	drop(list);
	assert_eq!(heap.live_values(), 0);
}

#[test]
fn invalid_utf8_string_is_error_value() {
	let heap = Heap::new();
	let value = heap.make_string(&[0x66, 0xFF, 0x6F]);
	assert!(value.is_error());
	assert_eq!(value.error().map(|err| err.code), Some(ErrorCode::InvalidString));
}

#[test]
fn error_values_release_like_any_other() {
	let heap = Heap::new();
	let err = heap.make_system_error(ErrorCode::Fail, "boom");
	assert!(err.is_error());
	assert_eq!(err.kind_label(), "error");
	drop(err);
	assert_eq!(heap.live_values(), 0);
}

#[test]
fn same_contents_compares_structure() {
	let heap = Heap::new();
	let left = heap.make_list(vec![heap.make_symbol("x"), heap.make_double(1.5)]);
	let right = heap.make_list(vec![heap.make_symbol("x"), heap.make_double(1.5)]);
	let other = heap.make_list(vec![heap.make_str("x"), heap.make_double(1.5)]);
	assert!(left.same_contents(&right));
	assert!(!left.same_contents(&other));
	assert!(!left.ptr_eq(&right));
	assert!(matches!(left.kind(), ValueKind::List(items) if items.len() == 2));
}

#[test]
fn display_renders_nested_lists() {
	let heap = Heap::new();
	let value = heap.make_list(vec![heap.make_symbol("print"), heap.make_str("hi"), heap.make_integer(3)]);
	assert_eq!(value.to_string(), "(print \"hi\" 3)");
	assert_eq!(heap.make_true().to_string(), "True");
}
