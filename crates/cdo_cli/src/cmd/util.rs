use cdo::defs::{Value, ValueKind};
use serde::Serialize;

/// Pretty-print `payload` as JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> crate::cmd::Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Render container name bytes, escaping anything non-printable.
pub(crate) fn render_name(name: &[u8]) -> String {
	let mut out = String::with_capacity(name.len());
	for chunk in name.utf8_chunks() {
		for ch in chunk.valid().chars() {
			if ch.is_control() {
				out.push_str(&format!("\\u{{{:x}}}", ch as u32));
			} else {
				out.push(ch);
			}
		}
		for byte in chunk.invalid() {
			out.push_str(&format!("\\x{byte:02x}"));
		}
	}
	out
}

/// Convert a runtime value to JSON.
///
/// Symbols and errors become single-key objects so they stay distinguishable
/// from strings.
pub(crate) fn value_json(value: &Value) -> serde_json::Value {
	match value.kind() {
		ValueKind::Nil => serde_json::Value::Null,
		ValueKind::True => serde_json::json!(true),
		ValueKind::Integer(number) => serde_json::json!(number),
		ValueKind::Double(number) => serde_json::json!(number),
		ValueKind::String(text) => serde_json::json!(text),
		ValueKind::Symbol(name) => serde_json::json!({ "symbol": name }),
		ValueKind::List(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
		ValueKind::Error(err) => serde_json::json!({ "error": err.code.as_str(), "message": err.message }),
	}
}

#[cfg(test)]
mod tests {
	use cdo::defs::Heap;

	use super::{render_name, value_json};

	#[test]
	fn names_escape_control_and_invalid_bytes() {
		assert_eq!(render_name(b"(boot)"), "(boot)");
		assert_eq!(render_name(b"a\tb"), "a\\u{9}b");
		assert_eq!(render_name(&[0x66, 0xFF]), "f\\xff");
	}

	#[test]
	fn symbols_and_lists_convert_to_json() {
		let heap = Heap::new();
		let value = heap.make_list(vec![heap.make_symbol("f"), heap.make_integer(2), heap.make_nil()]);
		assert_eq!(value_json(&value), serde_json::json!([{ "symbol": "f" }, 2, null]));
	}
}
