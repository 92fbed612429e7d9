use std::io::Write;

use cdo_testkit::{RawContainer, greet_container, tagged};

use super::{Evaluator, Runtime, RuntimeConfig};
use crate::defs::{ByteSource, EmbeddedSource, ErrorCode, Heap, Unstream, Value, ValueKind};

/// Evaluator that records what it was handed and echoes a fixed reply.
#[derive(Default)]
struct Recorder {
	calls: Vec<String>,
	entry_refs: Vec<usize>,
}

impl Evaluator for Recorder {
	fn top_level(&mut self, runtime: &Runtime, entry: &Value, args: Option<&Value>) -> Value {
		assert!(args.is_none());
		self.calls.push(entry.to_string());
		self.entry_refs.push(entry.ref_count());
		runtime.heap().make_str("ran")
	}
}

fn boot_container() -> Vec<u8> {
	RawContainer::new()
		.with_value("(boot)", &tagged::list(&[tagged::symbol("greet")]))
		.with_value("greet", &tagged::string("hello"))
		.build()
}

#[test]
fn load_and_run_invokes_boot_entry() {
	let mut runtime = Runtime::default();
	let mut source = EmbeddedSource::from_vec("app", boot_container());
	let mut evaluator = Recorder::default();

	let result = runtime.load_and_run(&mut source, &mut evaluator);
	assert_eq!(result.as_str(), Some("ran"));
	assert_eq!(evaluator.calls, vec!["(greet)".to_owned()]);
	assert_eq!(evaluator.entry_refs, vec![2]);
	assert!(!source.is_open());

	let boot = runtime.globals().get("(boot)").expect("boot defined");
	assert_eq!(boot.ref_count(), 1);
}

#[test]
fn load_failure_skips_evaluator_and_wraps_error() {
	let mut runtime = Runtime::default();
	let mut source = EmbeddedSource::from_vec("app", greet_container().version(2).build());
	let mut evaluator = Recorder::default();

	let result = runtime.load_and_run(&mut source, &mut evaluator);
	let err = result.error().expect("error value");
	assert_eq!(err.code, ErrorCode::Fail);
	assert!(err.message.starts_with("load failed"));
	assert!(evaluator.calls.is_empty());
	assert!(runtime.globals().is_empty());
	assert!(!source.is_open());

	drop(result);
	assert_eq!(runtime.heap().live_values(), 0);
}

#[test]
fn missing_entry_point_returns_link_error() {
	let mut runtime = Runtime::default();
	let mut source = EmbeddedSource::from_vec("app", greet_container().build());
	let mut evaluator = Recorder::default();

	let result = runtime.load_and_run(&mut source, &mut evaluator);
	assert_eq!(result.error().map(|err| err.code), Some(ErrorCode::UnboundSymbol));
	assert!(evaluator.calls.is_empty());
}

#[test]
fn custom_entry_point_is_linked() {
	let config = RuntimeConfig {
		entry_point: "greet".into(),
		..RuntimeConfig::default()
	};
	let mut runtime = Runtime::new(config);
	let mut source = EmbeddedSource::from_vec("app", greet_container().build());
	let mut evaluator = Recorder::default();

	let _ = runtime.load_and_run(&mut source, &mut evaluator);
	assert_eq!(evaluator.calls, vec!["\"hello\"".to_owned()]);
}

#[test]
fn load_only_layers_file_definitions() {
	let mut runtime = Runtime::default();
	let mut first = tempfile::NamedTempFile::new().expect("temp file");
	first.write_all(&greet_container().build()).expect("write");
	let mut second = tempfile::NamedTempFile::new().expect("temp file");
	second
		.write_all(&RawContainer::new().with_value("answer", &tagged::integer(42)).build())
		.expect("write");

	assert!(matches!(runtime.load_only(first.path()).kind(), ValueKind::True));
	assert!(matches!(runtime.load_only(second.path()).kind(), ValueKind::True));
	assert_eq!(runtime.globals().names(), vec!["answer", "greet"]);
	assert_eq!(runtime.heap().live_values(), 4);
}

#[test]
fn load_only_missing_file_is_io_error() {
	let mut runtime = Runtime::default();
	let dir = tempfile::tempdir().expect("temp dir");
	let result = runtime.load_only(dir.path().join("missing.cdo"));
	assert_eq!(result.error().map(|err| err.code), Some(ErrorCode::Io));
}

#[test]
fn strict_config_rejects_layered_redefinition() {
	let mut runtime = Runtime::new(RuntimeConfig::strict());
	let mut source = EmbeddedSource::from_vec("a", greet_container().build());
	runtime.load_source(&mut source).expect("first load");

	let mut again = EmbeddedSource::from_vec("b", greet_container().build());
	assert!(runtime.load_source(&mut again).is_err());
	assert!(!again.is_open());
	assert_eq!(runtime.globals().len(), 1);
}

/// Decoder that hands back the same shared value for every window.
struct Shared(Value);

impl Unstream for Shared {
	fn unstream(&self, _heap: &Heap, window: &[u8]) -> (Value, usize) {
		(self.0.retain(), window.len().min(1))
	}
}

#[test]
fn custom_unstreamer_references_are_balanced() {
	let template = Heap::new().make_str("shared");
	let mut runtime = Runtime::with_unstreamer(RuntimeConfig::default(), Box::new(Shared(template.retain())));
	let bytes = RawContainer::new().with_value("a", &[0]).with_value("b", &[0]).build();

	let mut source = EmbeddedSource::from_vec("mem", bytes);
	runtime.load_source(&mut source).expect("loads");
	// template + decoder + two table entries
	assert_eq!(template.ref_count(), 4);

	runtime.globals_mut().clear();
	assert_eq!(template.ref_count(), 2);
}

#[test]
fn release_drops_reference() {
	let runtime = Runtime::default();
	let value = runtime.heap().make_str("tmp");
	let keep = value.retain();
	runtime.release(value);
	assert_eq!(keep.ref_count(), 1);
}

#[test]
fn open_failure_is_reported_before_loading() {
	struct Broken;
	impl ByteSource for Broken {
		fn open(&mut self) -> crate::defs::Result<()> {
			Err(std::io::Error::other("device gone").into())
		}
		fn pointer(&self, _start: usize, _len: Option<usize>) -> crate::defs::Result<&[u8]> {
			unreachable!("never opened")
		}
		fn length(&self) -> crate::defs::Result<usize> {
			unreachable!("never opened")
		}
		fn close(&mut self) -> crate::defs::Result<()> {
			unreachable!("never opened")
		}
	}

	let mut runtime = Runtime::default();
	let result = runtime.load_and_run(&mut Broken, &mut Recorder::default());
	assert_eq!(result.error().map(|err| err.code), Some(ErrorCode::Io));
}
