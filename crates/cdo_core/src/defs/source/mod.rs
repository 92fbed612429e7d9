use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defs::compression::decode_bytes;
use crate::defs::{Compression, DefsError, Result};

/// Readable block of bytes a container is loaded from.
///
/// A source is opened, read and closed within a single load call. Reads
/// before `open` or after `close` fail with [`DefsError::SourceNotOpen`].
pub trait ByteSource {
	/// Acquire the underlying bytes.
	fn open(&mut self) -> Result<()>;

	/// Borrow `len` bytes from `start`, or everything from `start` when `len` is `None`.
	fn pointer(&self, start: usize, len: Option<usize>) -> Result<&[u8]>;

	/// Total number of readable bytes.
	fn length(&self) -> Result<usize>;

	/// Release the underlying bytes.
	fn close(&mut self) -> Result<()>;

	/// Short description used in log events.
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("source")
	}
}

fn slice_range(bytes: &[u8], start: usize, len: Option<usize>) -> Result<&[u8]> {
	let end = match len {
		Some(len) => start.checked_add(len),
		None => Some(bytes.len()),
	};
	end.and_then(|end| bytes.get(start..end)).ok_or(DefsError::RangeOutOfBounds {
		start,
		len: len.unwrap_or(0),
		source_len: bytes.len(),
	})
}

/// Container stored in a file, optionally zstd-compressed.
#[derive(Debug)]
pub struct FileSource {
	path: PathBuf,
	bytes: Option<Vec<u8>>,
	compression: Option<Compression>,
}

impl FileSource {
	/// Create a closed source for `path`.
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			bytes: None,
			compression: None,
		}
	}

	/// File path backing this source.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Compression detected by the last `open`.
	pub fn compression(&self) -> Option<Compression> {
		self.compression
	}
}

impl ByteSource for FileSource {
	fn open(&mut self) -> Result<()> {
		let raw = fs::read(&self.path)?;
		let (compression, bytes) = decode_bytes(raw)?;
		self.compression = Some(compression);
		self.bytes = Some(bytes);
		Ok(())
	}

	fn pointer(&self, start: usize, len: Option<usize>) -> Result<&[u8]> {
		let bytes = self.bytes.as_deref().ok_or(DefsError::SourceNotOpen)?;
		slice_range(bytes, start, len)
	}

	fn length(&self) -> Result<usize> {
		self.bytes.as_ref().map(Vec::len).ok_or(DefsError::SourceNotOpen)
	}

	fn close(&mut self) -> Result<()> {
		self.bytes.take().map(|_| ()).ok_or(DefsError::SourceNotOpen)
	}

	fn label(&self) -> Cow<'_, str> {
		self.path.to_string_lossy()
	}
}

/// Container linked into the host binary (for example via `include_bytes!`).
#[derive(Debug)]
pub struct EmbeddedSource {
	name: Cow<'static, str>,
	bytes: Cow<'static, [u8]>,
	open: bool,
}

impl EmbeddedSource {
	/// Wrap a static resource.
	pub fn new(name: &'static str, bytes: &'static [u8]) -> Self {
		Self {
			name: Cow::Borrowed(name),
			bytes: Cow::Borrowed(bytes),
			open: false,
		}
	}

	/// Wrap bytes produced at runtime.
	pub fn from_vec(name: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			name: Cow::Owned(name.into()),
			bytes: Cow::Owned(bytes),
			open: false,
		}
	}

	/// Return `true` between `open` and `close`.
	pub fn is_open(&self) -> bool {
		self.open
	}
}

impl ByteSource for EmbeddedSource {
	fn open(&mut self) -> Result<()> {
		self.open = true;
		Ok(())
	}

	fn pointer(&self, start: usize, len: Option<usize>) -> Result<&[u8]> {
		if !self.open {
			return Err(DefsError::SourceNotOpen);
		}
		slice_range(&self.bytes, start, len)
	}

	fn length(&self) -> Result<usize> {
		if !self.open {
			return Err(DefsError::SourceNotOpen);
		}
		Ok(self.bytes.len())
	}

	fn close(&mut self) -> Result<()> {
		if !self.open {
			return Err(DefsError::SourceNotOpen);
		}
		self.open = false;
		Ok(())
	}

	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed(&self.name)
	}
}
