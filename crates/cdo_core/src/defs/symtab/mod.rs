use std::collections::HashMap;

use crate::defs::{ErrorCode, Heap, Value};

/// What `add_entry` does when the name is already defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedefinePolicy {
	/// The new definition replaces the old one; old references are released.
	#[default]
	Replace,
	/// The insertion fails and the existing definition is kept.
	Reject,
}

struct Entry {
	name: Value,
	definition: Value,
}

/// Process-wide name to definition mapping.
///
/// The table owns one reference to every name and definition it holds;
/// callers keep (and must release) their own references.
#[derive(Default)]
pub struct GlobalSymbols {
	entries: HashMap<Box<str>, Entry>,
	policy: RedefinePolicy,
}

impl GlobalSymbols {
	/// Create an empty table.
	pub fn new(policy: RedefinePolicy) -> Self {
		Self {
			entries: HashMap::new(),
			policy,
		}
	}

	/// Active redefinition policy.
	pub fn policy(&self) -> RedefinePolicy {
		self.policy
	}

	/// Insert `definition` under `name`.
	///
	/// Returns the true sentinel on success, otherwise an error value with
	/// the table left untouched.
	pub fn add_entry(&mut self, heap: &Heap, name: &Value, definition: &Value) -> Value {
		let Some(key) = name.as_str() else {
			return heap.make_system_error(
				ErrorCode::NotString,
				&format!("symbol name must be a string, got {}", name.kind_label()),
			);
		};

		if self.policy == RedefinePolicy::Reject && self.entries.contains_key(key) {
			return heap.make_system_error(ErrorCode::Redefinition, &format!("{key} is already defined"));
		}

		let entry = Entry {
			name: name.retain(),
			definition: definition.retain(),
		};
		// A replaced entry drops here, releasing the previous references.
		let _previous = self.entries.insert(key.into(), entry);
		heap.make_true()
	}

	/// Resolve `name` to a new owned reference of its definition.
	pub fn lookup(&self, heap: &Heap, name: &str) -> Value {
		match self.entries.get(name) {
			Some(entry) => entry.definition.retain(),
			None => heap.make_system_error(ErrorCode::UnboundSymbol, &format!("no binding for symbol {name}")),
		}
	}

	/// Borrow the definition stored under `name`.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name).map(|entry| &entry.definition)
	}

	/// Borrow the name value stored for `name`.
	pub fn name_value(&self, name: &str) -> Option<&Value> {
		self.entries.get(name).map(|entry| &entry.name)
	}

	/// Return `true` when `name` is defined.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Number of definitions.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when nothing is defined.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Defined names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.entries.keys().map(AsRef::as_ref).collect();
		names.sort_unstable();
		names
	}

	/// Drop every definition, releasing the table's references.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

#[cfg(test)]
mod tests;
