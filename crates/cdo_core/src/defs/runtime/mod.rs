use std::path::Path;

use tracing::{debug, trace, warn};

use crate::defs::loader::load_definitions;
use crate::defs::{
	ByteSource, DefsError, ErrorCode, FileSource, GlobalSymbols, Heap, LoadReport, OffsetBase, RedefinePolicy, Result, TaggedUnstreamer, Unstream,
	UnstreamLimits, Value,
};

/// Runtime construction options.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
	/// Global symbol invoked by [`Runtime::load_and_run`].
	pub entry_point: Box<str>,
	/// Behavior when a loaded name is already defined.
	pub redefine: RedefinePolicy,
	/// Position container offsets are measured from.
	pub offset_base: OffsetBase,
	/// Limits applied by the default value decoder.
	pub unstream: UnstreamLimits,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			entry_point: "(boot)".into(),
			redefine: RedefinePolicy::Replace,
			offset_base: OffsetBase::DataRegion,
			unstream: UnstreamLimits::default(),
		}
	}
}

impl RuntimeConfig {
	/// Preset for layering containers where redefining a name is a mistake.
	pub fn strict() -> Self {
		Self {
			redefine: RedefinePolicy::Reject,
			..Self::default()
		}
	}
}

/// Expression evaluator the bootstrap driver hands the entry point to.
pub trait Evaluator {
	/// Resolve a global name to an owned reference of its definition.
	fn link(&mut self, runtime: &Runtime, name: &str) -> Value {
		runtime.link(name)
	}

	/// Invoke a resolved program at top level.
	fn top_level(&mut self, runtime: &Runtime, entry: &Value, args: Option<&Value>) -> Value;
}

/// Owner of the value heap, the global symbol table and the value decoder.
pub struct Runtime {
	heap: Heap,
	globals: GlobalSymbols,
	unstreamer: Box<dyn Unstream>,
	config: RuntimeConfig,
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new(RuntimeConfig::default())
	}
}

impl Runtime {
	/// Create a runtime using the tagged value decoder.
	pub fn new(config: RuntimeConfig) -> Self {
		let unstreamer = Box::new(TaggedUnstreamer::new(config.unstream));
		Self::with_unstreamer(config, unstreamer)
	}

	/// Create a runtime with a caller-supplied value decoder.
	pub fn with_unstreamer(config: RuntimeConfig, unstreamer: Box<dyn Unstream>) -> Self {
		Self {
			heap: Heap::new(),
			globals: GlobalSymbols::new(config.redefine),
			unstreamer,
			config,
		}
	}

	/// Value heap.
	pub fn heap(&self) -> &Heap {
		&self.heap
	}

	/// Global symbol table.
	pub fn globals(&self) -> &GlobalSymbols {
		&self.globals
	}

	/// Mutable global symbol table.
	pub fn globals_mut(&mut self) -> &mut GlobalSymbols {
		&mut self.globals
	}

	/// Active configuration.
	pub fn config(&self) -> &RuntimeConfig {
		&self.config
	}

	/// Release an owned reference on behalf of this runtime.
	pub fn release(&self, value: Value) {
		trace!(kind = value.kind_label(), refs = value.ref_count(), "release");
		drop(value);
	}

	/// Resolve a global name; unbound names yield an error value.
	pub fn link(&self, name: &str) -> Value {
		self.globals.lookup(&self.heap, name)
	}

	/// Register every definition in an already opened source.
	pub fn load_definitions(&mut self, source: &dyn ByteSource) -> Result<LoadReport> {
		load_definitions(&self.heap, &mut self.globals, self.unstreamer.as_ref(), source, self.config.offset_base)
	}

	/// Open `source`, register its definitions and close it again.
	///
	/// The source is closed even when loading fails; the load error wins
	/// over a close error.
	pub fn load_source(&mut self, source: &mut dyn ByteSource) -> Result<LoadReport> {
		source.open()?;
		let loaded = self.load_definitions(&*source);
		let closed = source.close();
		let report = loaded?;
		closed?;
		debug!(source = %source.label(), entries = report.entries, defined = self.globals.len(), "loaded definitions");
		Ok(report)
	}

	/// Load `source`, then run the entry point through `evaluator`.
	///
	/// Load failures come back as system error values and the evaluator is
	/// not invoked. An unbound entry point is returned as the link error.
	pub fn load_and_run(&mut self, source: &mut dyn ByteSource, evaluator: &mut dyn Evaluator) -> Value {
		if let Err(err) = self.load_source(source) {
			return self.failure_value(&source.label(), err);
		}

		let entry = evaluator.link(self, &self.config.entry_point);
		if entry.is_error() {
			warn!(entry_point = %self.config.entry_point, "entry point did not link");
			return entry;
		}

		let result = evaluator.top_level(self, &entry, None);
		self.release(entry);
		result
	}

	/// Layer the definitions of the container file at `path` into this runtime.
	///
	/// Returns true on success, otherwise a system error value.
	pub fn load_only(&mut self, path: impl AsRef<Path>) -> Value {
		let mut source = FileSource::new(path);
		match self.load_source(&mut source) {
			Ok(_) => self.heap.make_true(),
			Err(err) => self.failure_value(&source.label(), err),
		}
	}

	fn failure_value(&self, label: &str, err: DefsError) -> Value {
		warn!(source = label, error = %err, "definition load failed");
		let code = err.code();
		let message = match code {
			ErrorCode::Fail => format!("load failed: {err}"),
			_ => err.to_string(),
		};
		self.heap.make_system_error(code, &message)
	}
}

#[cfg(test)]
mod tests;
