use std::io::Read;

use crate::defs::{DefsError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;
/// zstd frame magic used by compressed containers.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a byte source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw container bytes.
	None,
	/// zstd-compressed container.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
///
/// Anything without the zstd frame magic is passed through unchanged; the
/// container parser decides whether it is a valid container.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}

	Ok((Compression::None, raw))
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(DefsError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::{Compression, decode_bytes};

	#[test]
	fn raw_bytes_pass_through() {
		let (mode, bytes) = decode_bytes(b"ODCCrest".to_vec()).expect("raw passes");
		assert_eq!(mode, Compression::None);
		assert_eq!(bytes, b"ODCCrest");
	}

	#[test]
	fn zstd_frames_are_expanded() {
		let packed = zstd::encode_all(&b"ODCC payload"[..], 3).expect("compresses");
		let (mode, bytes) = decode_bytes(packed).expect("decompresses");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(bytes, b"ODCC payload");
	}
}
