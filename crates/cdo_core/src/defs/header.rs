use crate::defs::bytes::Cursor;
use crate::defs::{DefsError, Result};

/// Fixed header at the start of every definition container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
	/// Container tag; always [`ContainerHeader::SIGNATURE`] once parsed.
	pub signature: u32,
	/// Format version; always [`ContainerHeader::VERSION`] once parsed.
	pub version: u32,
	/// Number of definitions described by the offset and name tables.
	pub entry_count: u32,
}

impl ContainerHeader {
	/// Header size in bytes.
	pub const SIZE: usize = 12;
	/// Four-character tag `'CCDO'` as a 32-bit word.
	///
	/// Stored little-endian, so the first four file bytes read `ODCC`.
	pub const SIGNATURE: u32 = u32::from_be_bytes(*b"CCDO");
	/// The only supported format version.
	pub const VERSION: u32 = 1;

	/// Header for a container holding `entry_count` definitions.
	pub fn new(entry_count: u32) -> Self {
		Self {
			signature: Self::SIGNATURE,
			version: Self::VERSION,
			entry_count,
		}
	}

	/// Parse and validate the header at the cursor position.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		if cursor.remaining() < Self::SIZE {
			return Err(DefsError::UnexpectedEof {
				at: cursor.pos(),
				need: Self::SIZE,
				rem: cursor.remaining(),
			});
		}

		let signature = cursor.read_u32_le()?;
		let version = cursor.read_u32_le()?;
		let entry_count = cursor.read_u32_le()?;

		if signature != Self::SIGNATURE {
			return Err(DefsError::BadSignature {
				found: signature,
				expected: Self::SIGNATURE,
			});
		}
		if version != Self::VERSION {
			return Err(DefsError::UnsupportedVersion {
				version,
				expected: Self::VERSION,
			});
		}

		Ok(Self {
			signature,
			version,
			entry_count,
		})
	}

	/// Number of entries as a native index type.
	pub fn entries(self) -> usize {
		self.entry_count as usize
	}

	/// Append the encoded header to `out`.
	pub fn write(self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.signature.to_le_bytes());
		out.extend_from_slice(&self.version.to_le_bytes());
		out.extend_from_slice(&self.entry_count.to_le_bytes());
	}
}

#[cfg(test)]
mod tests;
