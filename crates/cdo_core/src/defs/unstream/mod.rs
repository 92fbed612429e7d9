use thiserror::Error;

use crate::defs::bytes::Cursor;
use crate::defs::{DefsError, ErrorCode, Heap, Result, Value, ValueKind};

/// Self-delimiting byte-to-value decoder.
///
/// Implementations decode exactly one value from the front of `window` and
/// report how many bytes it occupied; trailing bytes belong to other
/// entries and are left untouched. Failure is reported as an error value.
pub trait Unstream {
	/// Decode one value, returning it with the number of bytes consumed.
	fn unstream(&self, heap: &Heap, window: &[u8]) -> (Value, usize);
}

/// Resource limits for [`TaggedUnstreamer`].
#[derive(Debug, Clone, Copy)]
pub struct UnstreamLimits {
	/// Maximum list nesting depth.
	pub max_depth: u32,
	/// Maximum element count of a single list.
	pub max_list_len: usize,
}

impl Default for UnstreamLimits {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_list_len: 65_536,
		}
	}
}

/// Reasons the tagged protocol rejects its input.
#[derive(Debug, Error)]
pub enum UnstreamFault {
	/// Window ended inside a value.
	#[error(transparent)]
	Truncated(#[from] DefsError),
	/// Leading byte is not a known tag.
	#[error("unknown value tag 0x{tag:02x} at offset {at}")]
	UnknownTag {
		/// Offending tag byte.
		tag: u8,
		/// Offset within the window.
		at: usize,
	},
	/// Lists nested deeper than allowed.
	#[error("list nesting exceeded depth {max_depth}")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// List declared more elements than allowed.
	#[error("list of {count} items exceeds limit {max}")]
	ListTooLong {
		/// Declared element count.
		count: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// String or symbol bytes are not UTF-8.
	#[error("text at offset {at} is not valid utf-8")]
	InvalidText {
		/// Offset of the text payload within the window.
		at: usize,
	},
}

const TAG_NIL: u8 = 0x00;
const TAG_TRUE: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_DOUBLE: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_SYMBOL: u8 = 0x05;
const TAG_LIST: u8 = 0x06;

/// Decoder for the tagged binary value encoding.
///
/// Each value is one tag byte followed by its payload: nothing for nil and
/// true, a little-endian `i32` or `f64`, a `u32` byte length plus UTF-8 text
/// for strings and symbols, or a `u32` item count plus the items for lists.
#[derive(Debug, Clone, Default)]
pub struct TaggedUnstreamer {
	limits: UnstreamLimits,
}

impl TaggedUnstreamer {
	/// Create a decoder with explicit limits.
	pub fn new(limits: UnstreamLimits) -> Self {
		Self { limits }
	}

	/// Decode one value, surfacing the structured fault on failure.
	pub fn decode(&self, heap: &Heap, window: &[u8]) -> std::result::Result<(Value, usize), UnstreamFault> {
		let mut cursor = Cursor::new(window);
		let value = self.read_value(heap, &mut cursor, 0)?;
		Ok((value, cursor.pos()))
	}

	fn read_value(&self, heap: &Heap, cursor: &mut Cursor<'_>, depth: u32) -> std::result::Result<Value, UnstreamFault> {
		let at = cursor.pos();
		let tag = cursor.read_u8()?;
		let value = match tag {
			TAG_NIL => heap.make_nil(),
			TAG_TRUE => heap.make_true(),
			TAG_INTEGER => heap.make_integer(cursor.read_i32_le()?),
			TAG_DOUBLE => heap.make_double(cursor.read_f64_le()?),
			TAG_STRING => heap.make_str(read_text(cursor)?),
			TAG_SYMBOL => heap.make_symbol(read_text(cursor)?),
			TAG_LIST => self.read_list(heap, cursor, depth)?,
			_ => return Err(UnstreamFault::UnknownTag { tag, at }),
		};
		Ok(value)
	}

	fn read_list(&self, heap: &Heap, cursor: &mut Cursor<'_>, depth: u32) -> std::result::Result<Value, UnstreamFault> {
		if depth >= self.limits.max_depth {
			return Err(UnstreamFault::DepthExceeded {
				max_depth: self.limits.max_depth,
			});
		}

		let count = cursor.read_u32_le()? as usize;
		if count > self.limits.max_list_len {
			return Err(UnstreamFault::ListTooLong {
				count,
				max: self.limits.max_list_len,
			});
		}

		// Items already decoded are released with `items` if a later one fails.
		let mut items = Vec::with_capacity(count.min(cursor.remaining()));
		for _ in 0..count {
			items.push(self.read_value(heap, cursor, depth + 1)?);
		}
		Ok(heap.make_list(items))
	}
}

impl Unstream for TaggedUnstreamer {
	fn unstream(&self, heap: &Heap, window: &[u8]) -> (Value, usize) {
		match self.decode(heap, window) {
			Ok(decoded) => decoded,
			Err(fault) => (heap.make_system_error(ErrorCode::Unstream, &fault.to_string()), 0),
		}
	}
}

fn read_text<'a>(cursor: &mut Cursor<'a>) -> std::result::Result<&'a str, UnstreamFault> {
	let len = cursor.read_u32_le()? as usize;
	let at = cursor.pos();
	let raw = cursor.read_exact(len)?;
	std::str::from_utf8(raw).map_err(|_| UnstreamFault::InvalidText { at })
}

/// Append the tagged encoding of `value` to `out`.
///
/// `limits` are the ones the reading side decodes with; values that would
/// exceed them are refused so every streamed value can be read back.
pub fn stream_value(value: &Value, limits: &UnstreamLimits, out: &mut Vec<u8>) -> Result<()> {
	write_value(value, limits, 0, out)
}

fn write_value(value: &Value, limits: &UnstreamLimits, depth: u32, out: &mut Vec<u8>) -> Result<()> {
	match value.kind() {
		ValueKind::Nil => out.push(TAG_NIL),
		ValueKind::True => out.push(TAG_TRUE),
		ValueKind::Integer(number) => {
			out.push(TAG_INTEGER);
			out.extend_from_slice(&number.to_le_bytes());
		}
		ValueKind::Double(number) => {
			out.push(TAG_DOUBLE);
			out.extend_from_slice(&number.to_le_bytes());
		}
		ValueKind::String(text) => write_text(out, TAG_STRING, text)?,
		ValueKind::Symbol(name) => write_text(out, TAG_SYMBOL, name)?,
		ValueKind::List(items) => {
			if depth >= limits.max_depth {
				return Err(DefsError::StreamTooDeep {
					max_depth: limits.max_depth,
				});
			}
			if items.len() > limits.max_list_len {
				return Err(DefsError::StreamListTooLong {
					count: items.len(),
					max: limits.max_list_len,
				});
			}
			out.push(TAG_LIST);
			out.extend_from_slice(&len_u32("list", items.len())?.to_le_bytes());
			for item in items {
				write_value(item, limits, depth + 1, out)?;
			}
		}
		ValueKind::Error(_) => return Err(DefsError::StreamUnsupported { kind: value.kind_label() }),
	}
	Ok(())
}

fn write_text(out: &mut Vec<u8>, tag: u8, text: &str) -> Result<()> {
	out.push(tag);
	out.extend_from_slice(&len_u32("text", text.len())?.to_le_bytes());
	out.extend_from_slice(text.as_bytes());
	Ok(())
}

fn len_u32(what: &'static str, len: usize) -> Result<u32> {
	u32::try_from(len).map_err(|_| DefsError::StreamTooLong { what, len })
}
