use thiserror::Error;

use crate::defs::ErrorCode;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DefsError>;

/// Errors produced while opening, parsing, and registering definition containers.
#[derive(Debug, Error)]
pub enum DefsError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Byte source was used before `open` or after `close`.
	#[error("byte source is not open")]
	SourceNotOpen,
	/// Requested byte range lies outside the byte source.
	#[error("byte range out of bounds: start={start}, len={len}, source={source_len}")]
	RangeOutOfBounds {
		/// Requested start offset.
		start: usize,
		/// Requested length.
		len: usize,
		/// Total source length.
		source_len: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Leading container tag did not match.
	#[error("bad container signature 0x{found:08x} (expected 0x{expected:08x})")]
	BadSignature {
		/// Signature read from the header.
		found: u32,
		/// Signature this loader understands.
		expected: u32,
	},
	/// Container version is not the supported one.
	#[error("unsupported container version {version} (expected {expected})")]
	UnsupportedVersion {
		/// Version read from the header.
		version: u32,
		/// Version this loader understands.
		expected: u32,
	},
	/// Name table ended before a NUL terminator was found.
	#[error("name {index} is missing its NUL terminator (starts at offset {at})")]
	MissingNameTerminator {
		/// Entry index of the unterminated name.
		index: usize,
		/// Byte offset where the name starts.
		at: usize,
	},
	/// Entry offset does not address a byte inside the data region.
	#[error("entry {index} offset {offset} out of range (region length {region_len})")]
	OffsetOutOfRange {
		/// Entry index.
		index: usize,
		/// Offending offset.
		offset: u32,
		/// Length of the region offsets are resolved against.
		region_len: usize,
	},
	/// Value protocol rejected the bytes at an entry's offset.
	#[error("entry {index} ({name}) failed to unstream: {message}")]
	Unstream {
		/// Entry index.
		index: usize,
		/// Entry name, lossily decoded.
		name: String,
		/// Diagnostic carried by the error value.
		message: String,
	},
	/// Entry name could not be turned into a string value.
	///
	/// Names must be UTF-8; arbitrary byte names are not transcribed.
	#[error("entry {index} has an invalid name: {message}")]
	InvalidName {
		/// Entry index.
		index: usize,
		/// Diagnostic carried by the error value.
		message: String,
	},
	/// Global symbol table refused the entry.
	#[error("symbol table rejected {name}: {message}")]
	SymbolRejected {
		/// Entry name.
		name: String,
		/// Diagnostic carried by the error value.
		message: String,
	},
	/// Entry name cannot be written into a NUL-terminated name table.
	#[error("entry name {name:?} contains a NUL byte")]
	NameContainsNul {
		/// Offending name.
		name: String,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Value kind has no streamed representation.
	#[error("cannot stream {kind} values")]
	StreamUnsupported {
		/// Kind label of the offending value.
		kind: &'static str,
	},
	/// Lists nest deeper than the reading side accepts.
	#[error("cannot stream lists nested deeper than {max_depth}")]
	StreamTooDeep {
		/// Depth ceiling shared with the decoder.
		max_depth: u32,
	},
	/// List holds more items than the reading side accepts.
	#[error("cannot stream a list of {count} items (limit {max})")]
	StreamListTooLong {
		/// Item count of the offending list.
		count: usize,
		/// Length ceiling shared with the decoder.
		max: usize,
	},
	/// Streamed field would not fit its length prefix.
	#[error("{what} too long to stream: {len}")]
	StreamTooLong {
		/// Field being written.
		what: &'static str,
		/// Offending length.
		len: usize,
	},
}

impl DefsError {
	/// Map to the value-level error code surfaced to hosts.
	///
	/// Every format and registration failure collapses to [`ErrorCode::Fail`];
	/// only source-level failures keep a distinct code.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Io(_) => ErrorCode::Io,
			Self::SourceNotOpen => ErrorCode::NotOpen,
			Self::DecompressedTooLarge { .. } => ErrorCode::Decompress,
			_ => ErrorCode::Fail,
		}
	}
}
