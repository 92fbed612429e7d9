use tracing::{debug, trace};

use crate::defs::{ByteSource, DefinitionTable, DefsError, GlobalSymbols, Heap, OffsetBase, Result, Unstream};

/// Summary of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
	/// Number of definitions registered.
	pub entries: usize,
	/// Total container length in bytes.
	pub container_len: usize,
	/// Byte offset where the data region starts.
	pub data_start: usize,
}

/// Parse the container held by an opened `source` and register every entry.
///
/// Entries are registered in table order. A failure aborts the remaining
/// entries but does not unregister the ones already added by this call.
pub fn load_definitions(
	heap: &Heap,
	globals: &mut GlobalSymbols,
	unstreamer: &dyn Unstream,
	source: &dyn ByteSource,
	offset_base: OffsetBase,
) -> Result<LoadReport> {
	let len = source.length()?;
	let bytes = source.pointer(0, Some(len))?;
	let table = DefinitionTable::parse(bytes)?;
	debug!(
		source = %source.label(),
		entries = table.len(),
		data_start = table.data_start,
		text_block_size = table.text_block_size,
		"parsed definition table"
	);

	for index in 0..table.len() {
		let window = table.window(index, offset_base, bytes)?;

		let (definition, consumed) = unstreamer.unstream(heap, window);
		if let Some(err) = definition.error() {
			return Err(DefsError::Unstream {
				index,
				name: table.name_lossy(index).into_owned(),
				message: err.message.to_string(),
			});
		}

		let name = heap.make_string(&table.names[index]);
		if let Some(err) = name.error() {
			return Err(DefsError::InvalidName {
				index,
				message: err.message.to_string(),
			});
		}

		let added = globals.add_entry(heap, &name, &definition);
		if let Some(err) = added.error() {
			return Err(DefsError::SymbolRejected {
				name: table.name_lossy(index).into_owned(),
				message: err.message.to_string(),
			});
		}

		trace!(index, name = %table.name_lossy(index), consumed, kind = definition.kind_label(), "registered definition");
		// The table holds its own references now.
		drop((added, name, definition));
	}

	Ok(LoadReport {
		entries: table.len(),
		container_len: len,
		data_start: table.data_start,
	})
}
