//! Shared test helpers for workspace crates.
//!
//! Containers are assembled byte by byte here, independently of the
//! writer in `cdo`, so tests exercise the parser against a second encoder.

use std::path::{Path, PathBuf};

/// On-disk bytes of the `'CCDO'` tag (the 32-bit word stored little-endian).
pub const SIGNATURE_BYTES: [u8; 4] = *b"ODCC";

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Byte-level container builder.
#[derive(Debug, Clone)]
pub struct RawContainer {
	/// First four bytes.
	pub signature: [u8; 4],
	/// Version word.
	pub version: u32,
	/// Entry-count override; defaults to `names.len()`.
	pub entry_count: Option<u32>,
	/// `(name, offset)` pairs.
	pub entries: Vec<(Vec<u8>, u32)>,
	/// Legacy text-block size word.
	pub text_block_size: u32,
	/// Data region bytes.
	pub data: Vec<u8>,
}

impl Default for RawContainer {
	fn default() -> Self {
		Self {
			signature: SIGNATURE_BYTES,
			version: 1,
			entry_count: None,
			entries: Vec::new(),
			text_block_size: 0,
			data: Vec::new(),
		}
	}
}

impl RawContainer {
	/// Empty version-1 container.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a named entry whose payload is `payload`, placed at the end of the data region.
	pub fn with_value(mut self, name: &str, payload: &[u8]) -> Self {
		let offset = self.data.len() as u32;
		self.entries.push((name.as_bytes().to_vec(), offset));
		self.data.extend_from_slice(payload);
		self
	}

	/// Append a named entry with an explicit offset and no payload.
	pub fn with_offset(mut self, name: &[u8], offset: u32) -> Self {
		self.entries.push((name.to_vec(), offset));
		self
	}

	/// Override the version word.
	pub fn version(mut self, version: u32) -> Self {
		self.version = version;
		self
	}

	/// Override the signature bytes.
	pub fn signature(mut self, signature: [u8; 4]) -> Self {
		self.signature = signature;
		self
	}

	/// Override the entry-count word.
	pub fn entry_count(mut self, count: u32) -> Self {
		self.entry_count = Some(count);
		self
	}

	/// Append raw bytes to the data region.
	pub fn data(mut self, bytes: &[u8]) -> Self {
		self.data.extend_from_slice(bytes);
		self
	}

	/// Byte offset where the name table ends.
	pub fn names_end(&self) -> usize {
		12 + 4 * self.entries.len() + 4 + self.entries.iter().map(|(name, _)| name.len() + 1).sum::<usize>()
	}

	/// Encode the container.
	pub fn build(&self) -> Vec<u8> {
		let count = self.entry_count.unwrap_or(self.entries.len() as u32);
		let mut out = Vec::new();
		out.extend_from_slice(&self.signature);
		out.extend_from_slice(&self.version.to_le_bytes());
		out.extend_from_slice(&count.to_le_bytes());
		for (_, offset) in &self.entries {
			out.extend_from_slice(&offset.to_le_bytes());
		}
		out.extend_from_slice(&self.text_block_size.to_le_bytes());
		for (name, _) in &self.entries {
			out.extend_from_slice(name);
			out.push(0);
		}
		out.extend_from_slice(&self.data);
		out
	}
}

/// The `greet -> "hello"` container used across tests.
pub fn greet_container() -> RawContainer {
	RawContainer::new().with_value("greet", &tagged::string("hello"))
}

/// Independent encoder for the tagged value protocol.
pub mod tagged {
	/// Nil tag.
	pub const NIL: u8 = 0x00;
	/// True tag.
	pub const TRUE: u8 = 0x01;
	/// Integer tag.
	pub const INTEGER: u8 = 0x02;
	/// Double tag.
	pub const DOUBLE: u8 = 0x03;
	/// String tag.
	pub const STRING: u8 = 0x04;
	/// Symbol tag.
	pub const SYMBOL: u8 = 0x05;
	/// List tag.
	pub const LIST: u8 = 0x06;

	/// Encode nil.
	pub fn nil() -> Vec<u8> {
		vec![NIL]
	}

	/// Encode true.
	pub fn truth() -> Vec<u8> {
		vec![TRUE]
	}

	/// Encode an integer.
	pub fn integer(value: i32) -> Vec<u8> {
		let mut out = vec![INTEGER];
		out.extend_from_slice(&value.to_le_bytes());
		out
	}

	/// Encode a string.
	pub fn string(text: &str) -> Vec<u8> {
		text_payload(STRING, text.as_bytes())
	}

	/// Encode a symbol.
	pub fn symbol(name: &str) -> Vec<u8> {
		text_payload(SYMBOL, name.as_bytes())
	}

	/// Encode a list of already-encoded items.
	pub fn list(items: &[Vec<u8>]) -> Vec<u8> {
		let mut out = vec![LIST];
		out.extend_from_slice(&(items.len() as u32).to_le_bytes());
		for item in items {
			out.extend_from_slice(item);
		}
		out
	}

	fn text_payload(tag: u8, bytes: &[u8]) -> Vec<u8> {
		let mut out = vec![tag];
		out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
		out.extend_from_slice(bytes);
		out
	}
}
