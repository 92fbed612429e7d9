use std::borrow::Cow;

use crate::defs::bytes::Cursor;
use crate::defs::{ContainerHeader, DefsError, Result};

/// Position entry offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetBase {
	/// Offsets start at the data region right after the name table.
	#[default]
	DataRegion,
	/// Offsets are absolute positions in the container buffer, bounded by
	/// its total length. This is how existing container loaders address
	/// entries, so it is the mode for interoperating with their files.
	Buffer,
}

impl OffsetBase {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::DataRegion => "data_region",
			Self::Buffer => "buffer",
		}
	}
}

/// Decoded header, offset table and name table of a definition container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTable {
	/// Validated container header.
	pub header: ContainerHeader,
	/// Per-entry offsets, paired by position with `names`.
	pub offsets: Vec<u32>,
	/// Per-entry names without their NUL terminators.
	pub names: Vec<Box<[u8]>>,
	/// Legacy text-block size field; read but never used for bounds checks.
	pub text_block_size: u32,
	/// Byte offset where the data region begins.
	pub data_start: usize,
}

impl DefinitionTable {
	/// Parse the header, offset table and name table from a full container buffer.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		let header = ContainerHeader::parse(&mut cursor)?;
		let count = header.entries();

		// A bare header declaring no entries is a complete, empty container.
		if count == 0 && cursor.remaining() == 0 {
			return Ok(Self {
				header,
				offsets: Vec::new(),
				names: Vec::new(),
				text_block_size: 0,
				data_start: cursor.pos(),
			});
		}

		let mut offsets = Vec::with_capacity(count.min(cursor.remaining() / 4));
		for _ in 0..count {
			offsets.push(cursor.read_u32_le()?);
		}

		let text_block_size = cursor.read_u32_le()?;

		let mut names = Vec::with_capacity(count);
		for index in 0..count {
			let at = cursor.pos();
			let name = cursor
				.read_cstring_bytes()
				.map_err(|_| DefsError::MissingNameTerminator { index, at })?;
			names.push(Box::from(name));
		}

		Ok(Self {
			header,
			offsets,
			names,
			text_block_size,
			data_start: cursor.pos(),
		})
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.offsets.len()
	}

	/// Return `true` when the container defines nothing.
	pub fn is_empty(&self) -> bool {
		self.offsets.is_empty()
	}

	/// Entry name, lossily decoded for diagnostics.
	pub fn name_lossy(&self, index: usize) -> Cow<'_, str> {
		match self.names.get(index) {
			Some(name) => String::from_utf8_lossy(name),
			None => Cow::Borrowed(""),
		}
	}

	/// Byte offset in the buffer that entry offsets are resolved against.
	pub fn region_start(&self, base: OffsetBase) -> usize {
		match base {
			OffsetBase::DataRegion => self.data_start,
			OffsetBase::Buffer => 0,
		}
	}

	/// Carve the window for entry `index`: from its offset to the end of `bytes`.
	///
	/// The window deliberately runs past the entry's own bytes; the value
	/// protocol is self-delimiting and stops where its value ends.
	pub fn window<'a>(&self, index: usize, base: OffsetBase, bytes: &'a [u8]) -> Result<&'a [u8]> {
		let region = bytes.get(self.region_start(base)..).unwrap_or(&[]);
		let offset = self.offsets.get(index).copied().ok_or(DefsError::OffsetOutOfRange {
			index,
			offset: u32::MAX,
			region_len: region.len(),
		})?;

		let start = offset as usize;
		if start >= region.len() {
			return Err(DefsError::OffsetOutOfRange {
				index,
				offset,
				region_len: region.len(),
			});
		}

		Ok(&region[start..])
	}
}
