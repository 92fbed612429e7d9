use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Value-level error codes carried by [`ValueKind::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	/// Generic failure; every container format failure uses this code.
	Fail,
	/// Byte source could not be read.
	Io,
	/// Byte source used while closed.
	NotOpen,
	/// Bytes are not a valid string.
	InvalidString,
	/// Value protocol rejected its input.
	Unstream,
	/// Symbol table refused to replace an existing definition.
	Redefinition,
	/// Symbol has no global definition.
	UnboundSymbol,
	/// Symbol table keys must be strings.
	NotString,
	/// Compressed source could not be expanded.
	Decompress,
}

impl ErrorCode {
	/// Stable numeric code.
	pub fn as_u32(self) -> u32 {
		match self {
			Self::Fail => 1,
			Self::Io => 2,
			Self::NotOpen => 3,
			Self::InvalidString => 4,
			Self::Unstream => 5,
			Self::Redefinition => 6,
			Self::UnboundSymbol => 7,
			Self::NotString => 8,
			Self::Decompress => 9,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fail => "fail",
			Self::Io => "io",
			Self::NotOpen => "not_open",
			Self::InvalidString => "invalid_string",
			Self::Unstream => "unstream",
			Self::Redefinition => "redefinition",
			Self::UnboundSymbol => "unbound_symbol",
			Self::NotString => "not_string",
			Self::Decompress => "decompress",
		}
	}
}

/// Diagnostic payload of an error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemError {
	/// Failure class.
	pub code: ErrorCode,
	/// Human-readable detail.
	pub message: Box<str>,
}

/// Discriminant and payload of a value.
#[derive(Debug)]
pub enum ValueKind {
	/// Empty list / false.
	Nil,
	/// Canonical true.
	True,
	/// 32-bit integer.
	Integer(i32),
	/// Double-precision float.
	Double(f64),
	/// Immutable string.
	String(Box<str>),
	/// Identifier resolved by the evaluator.
	Symbol(Box<str>),
	/// Ordered list of owned values.
	List(Vec<Value>),
	/// Failure signal.
	Error(SystemError),
}

impl ValueKind {
	/// Stable lowercase kind label.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::True => "true",
			Self::Integer(_) => "integer",
			Self::Double(_) => "double",
			Self::String(_) => "string",
			Self::Symbol(_) => "symbol",
			Self::List(_) => "list",
			Self::Error(_) => "error",
		}
	}
}

#[derive(Debug, Default)]
struct HeapCounters {
	live: Cell<usize>,
	allocated: Cell<usize>,
}

struct ValueCell {
	kind: ValueKind,
	counters: Rc<HeapCounters>,
}

impl Drop for ValueCell {
	fn drop(&mut self) {
		let live = self.counters.live.get();
		self.counters.live.set(live.saturating_sub(1));
	}
}

/// Allocator for values that tracks how many cells are alive.
///
/// Cells keep a handle to the heap counters, so a value outliving its heap
/// still decrements the live count when its last reference is released.
#[derive(Debug, Default)]
pub struct Heap {
	counters: Rc<HeapCounters>,
}

impl Heap {
	/// Create an empty heap.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of value cells currently alive.
	pub fn live_values(&self) -> usize {
		self.counters.live.get()
	}

	/// Number of value cells ever allocated.
	pub fn total_allocated(&self) -> usize {
		self.counters.allocated.get()
	}

	/// Allocate a new cell holding `kind`.
	pub fn alloc(&self, kind: ValueKind) -> Value {
		self.counters.live.set(self.counters.live.get() + 1);
		self.counters.allocated.set(self.counters.allocated.get() + 1);
		Value(Rc::new(ValueCell {
			kind,
			counters: Rc::clone(&self.counters),
		}))
	}

	/// Build a string value from raw bytes; non-UTF-8 input yields an error value.
	pub fn make_string(&self, bytes: &[u8]) -> Value {
		match std::str::from_utf8(bytes) {
			Ok(text) => self.make_str(text),
			Err(err) => self.make_system_error(ErrorCode::InvalidString, &err.to_string()),
		}
	}

	/// Build a string value.
	pub fn make_str(&self, text: &str) -> Value {
		self.alloc(ValueKind::String(text.into()))
	}

	/// Build a symbol value.
	pub fn make_symbol(&self, name: &str) -> Value {
		self.alloc(ValueKind::Symbol(name.into()))
	}

	/// Build the canonical true value.
	pub fn make_true(&self) -> Value {
		self.alloc(ValueKind::True)
	}

	/// Build the nil value.
	pub fn make_nil(&self) -> Value {
		self.alloc(ValueKind::Nil)
	}

	/// Build an integer value.
	pub fn make_integer(&self, value: i32) -> Value {
		self.alloc(ValueKind::Integer(value))
	}

	/// Build a double value.
	pub fn make_double(&self, value: f64) -> Value {
		self.alloc(ValueKind::Double(value))
	}

	/// Build a list value, taking ownership of `items`.
	pub fn make_list(&self, items: Vec<Value>) -> Value {
		self.alloc(ValueKind::List(items))
	}

	/// Build an error value.
	pub fn make_system_error(&self, code: ErrorCode, message: &str) -> Value {
		self.alloc(ValueKind::Error(SystemError {
			code,
			message: message.into(),
		}))
	}
}

/// Owned reference to a reference-counted value cell.
///
/// `Value` is move-only. Extra references are taken with [`Value::retain`]
/// and released by dropping (or by `Runtime::release`).
pub struct Value(Rc<ValueCell>);

impl Value {
	/// Take an additional owned reference to the same cell.
	#[must_use]
	pub fn retain(&self) -> Value {
		Value(Rc::clone(&self.0))
	}

	/// Number of owned references to this cell.
	pub fn ref_count(&self) -> usize {
		Rc::strong_count(&self.0)
	}

	/// Return `true` when both handles point at the same cell.
	pub fn ptr_eq(&self, other: &Value) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Borrow the discriminant and payload.
	pub fn kind(&self) -> &ValueKind {
		&self.0.kind
	}

	/// Stable lowercase kind label.
	pub fn kind_label(&self) -> &'static str {
		self.0.kind.label()
	}

	/// Return `true` for error values.
	pub fn is_error(&self) -> bool {
		matches!(self.0.kind, ValueKind::Error(_))
	}

	/// Return `true` for nil.
	pub fn is_nil(&self) -> bool {
		matches!(self.0.kind, ValueKind::Nil)
	}

	/// String payload, if this is a string value.
	pub fn as_str(&self) -> Option<&str> {
		match &self.0.kind {
			ValueKind::String(text) => Some(text),
			_ => None,
		}
	}

	/// Error payload, if this is an error value.
	pub fn error(&self) -> Option<&SystemError> {
		match &self.0.kind {
			ValueKind::Error(err) => Some(err),
			_ => None,
		}
	}

	/// Structural equality, ignoring cell identity.
	pub fn same_contents(&self, other: &Value) -> bool {
		if self.ptr_eq(other) {
			return true;
		}

		match (self.kind(), other.kind()) {
			(ValueKind::Nil, ValueKind::Nil) | (ValueKind::True, ValueKind::True) => true,
			(ValueKind::Integer(left), ValueKind::Integer(right)) => left == right,
			(ValueKind::Double(left), ValueKind::Double(right)) => left.to_bits() == right.to_bits(),
			(ValueKind::String(left), ValueKind::String(right)) => left == right,
			(ValueKind::Symbol(left), ValueKind::Symbol(right)) => left == right,
			(ValueKind::List(left), ValueKind::List(right)) => {
				left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.same_contents(r))
			}
			(ValueKind::Error(left), ValueKind::Error(right)) => left == right,
			_ => false,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.0.kind, f)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind() {
			ValueKind::Nil => f.write_str("Nil"),
			ValueKind::True => f.write_str("True"),
			ValueKind::Integer(value) => write!(f, "{value}"),
			ValueKind::Double(value) => write!(f, "{value:?}"),
			ValueKind::String(text) => write!(f, "{text:?}"),
			ValueKind::Symbol(name) => f.write_str(name),
			ValueKind::List(items) => {
				f.write_str("(")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str(")")
			}
			ValueKind::Error(err) => write!(f, "#error[{}] {}", err.code.as_str(), err.message),
		}
	}
}

#[cfg(test)]
mod tests;
