use crate::defs::{DefsError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return the unread tail without advancing.
	pub fn rest(&self) -> &'a [u8] {
		self.bytes.get(self.pos..).unwrap_or(&[])
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(DefsError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_le_bytes(buf))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(i32::from_le_bytes(buf))
	}

	/// Read a little-endian `f64`.
	pub fn read_f64_le(&mut self) -> Result<f64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(f64::from_le_bytes(buf))
	}

	/// Read a zero-terminated byte string without the terminator.
	pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = self.rest();
		let Some(rel_end) = rem.iter().position(|byte| *byte == 0) else {
			return Err(DefsError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: self.remaining(),
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;
	use crate::defs::DefsError;

	#[test]
	fn reads_little_endian_words() {
		let bytes = [0x01, 0x00, 0x00, 0x00, 0xFE, 0xFF, 0xFF, 0xFF];
		let mut cursor = Cursor::new(&bytes);
		assert_eq!(cursor.read_u32_le().expect("u32"), 1);
		assert_eq!(cursor.read_i32_le().expect("i32"), -2);
		assert_eq!(cursor.remaining(), 0);
	}

	#[test]
	fn short_read_reports_position_and_leaves_cursor() {
		let bytes = [1_u8, 2, 3];
		let mut cursor = Cursor::new(&bytes);
		cursor.read_u8().expect("first byte");
		let err = cursor.read_u32_le().expect_err("only two bytes left");
		assert!(matches!(err, DefsError::UnexpectedEof { at: 1, need: 4, rem: 2 }));
		assert_eq!(cursor.pos(), 1);
	}

	#[test]
	fn cstring_requires_terminator() {
		let mut cursor = Cursor::new(b"boot\0main");
		assert_eq!(cursor.read_cstring_bytes().expect("terminated"), b"boot");
		assert_eq!(cursor.pos(), 5);
		assert!(cursor.read_cstring_bytes().is_err());
		assert_eq!(cursor.rest(), b"main");
	}
}
