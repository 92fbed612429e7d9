mod bytes;
mod compression;
mod container;
mod error;
mod header;
mod loader;
mod runtime;
mod source;
mod symtab;
mod unstream;
mod value;
mod writer;

/// Bounded byte cursor.
pub use bytes::Cursor;
/// Compression detection result.
pub use compression::Compression;
/// Offset and name tables and window carving.
pub use container::{DefinitionTable, OffsetBase};
/// Error and result aliases.
pub use error::{DefsError, Result};
/// Fixed container header.
pub use header::ContainerHeader;
/// Per-entry deserialization and registration.
pub use loader::{LoadReport, load_definitions};
/// Runtime owner and bootstrap entry points.
pub use runtime::{Evaluator, Runtime, RuntimeConfig};
/// Byte-source contract and the file and embedded sources.
pub use source::{ByteSource, EmbeddedSource, FileSource};
/// Global symbol table.
pub use symtab::{GlobalSymbols, RedefinePolicy};
/// Value deserialization protocol.
pub use unstream::{TaggedUnstreamer, Unstream, UnstreamFault, UnstreamLimits, stream_value};
/// Reference-counted value model.
pub use value::{ErrorCode, Heap, SystemError, Value, ValueKind};
/// Container encoder.
pub use writer::ContainerWriter;
