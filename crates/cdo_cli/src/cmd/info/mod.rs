use std::path::PathBuf;

use cdo::defs::{ByteSource, DefinitionTable, FileSource, OffsetBase};

use crate::cmd::Result;
use crate::cmd::util::{emit_json, render_name};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Treat entry offsets as absolute buffer positions.
	#[arg(long = "absolute-offsets")]
	pub absolute_offsets: bool,
}

/// Print the container header and the offset/name tables.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		absolute_offsets,
	} = args;
	let base = if absolute_offsets { OffsetBase::Buffer } else { OffsetBase::DataRegion };

	let mut source = FileSource::new(&path);
	source.open()?;
	let bytes = source.pointer(0, None)?;
	let table = DefinitionTable::parse(bytes)?;
	let region_start = table.region_start(base);
	let region_len = bytes.len().saturating_sub(region_start);

	let entries: Vec<EntryJson> = (0..table.len())
		.map(|index| {
			let offset = table.offsets[index];
			EntryJson {
				name: render_name(&table.names[index]),
				offset,
				in_range: (offset as usize) < region_len,
			}
		})
		.collect();

	let payload = InfoJson {
		path: path.display().to_string(),
		compression: source.compression().map_or("none", |mode| mode.as_str()),
		container_len: bytes.len(),
		signature: format!("0x{:08x}", table.header.signature),
		version: table.header.version,
		entry_count: table.header.entry_count,
		text_block_size: table.text_block_size,
		data_start: table.data_start,
		offset_base: base.as_str(),
		region_len,
		entries,
	};
	source.close()?;

	if json {
		return emit_json(&payload);
	}

	println!("path: {}", payload.path);
	println!("compression: {}", payload.compression);
	println!("container_len: {}", payload.container_len);
	println!("signature: {}", payload.signature);
	println!("version: {}", payload.version);
	println!("entry_count: {}", payload.entry_count);
	println!("text_block_size: {}", payload.text_block_size);
	println!("data_start: {}", payload.data_start);
	println!("offset_base: {}", payload.offset_base);
	println!("region_len: {}", payload.region_len);
	println!("entries:");
	for entry in &payload.entries {
		let flag = if entry.in_range { "" } else { " (out of range)" };
		println!("  {:>8}  {}{}", entry.offset, entry.name, flag);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	container_len: usize,
	signature: String,
	version: u32,
	entry_count: u32,
	text_block_size: u32,
	data_start: usize,
	offset_base: &'static str,
	region_len: usize,
	entries: Vec<EntryJson>,
}

#[derive(serde::Serialize)]
struct EntryJson {
	name: String,
	offset: u32,
	in_range: bool,
}
