use std::fs;
use std::path::PathBuf;

use cdo::defs::{ContainerWriter, Heap, Value};

use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// JSON object mapping definition names to values.
	pub input: PathBuf,
	/// Container file to write.
	#[arg(short, long)]
	pub output: PathBuf,
	/// Write a zstd-compressed container.
	#[arg(long)]
	pub compress: bool,
	#[arg(long, default_value_t = 3)]
	pub level: i32,
}

/// Convert a JSON definition set into a container file.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		output,
		compress,
		level,
	} = args;

	let raw = fs::read(&input)?;
	let json: serde_json::Value = serde_json::from_slice(&raw)?;
	let serde_json::Value::Object(definitions) = json else {
		return Err(CliError::InvalidInput {
			reason: "top level must be an object of name -> value".to_owned(),
		});
	};

	let heap = Heap::new();
	let mut writer = ContainerWriter::new();
	for (name, item) in &definitions {
		let value = json_value(&heap, item)?;
		writer.push(name, &value)?;
	}

	let mut bytes = writer.finish()?;
	if compress {
		bytes = zstd::encode_all(bytes.as_slice(), level)?;
	}
	fs::write(&output, &bytes)?;

	println!("packed {} definitions into {} ({} bytes)", writer.len(), output.display(), bytes.len());
	Ok(())
}

/// Build a runtime value from JSON.
///
/// `false` maps to nil, integers that fit in 32 bits to integers, other
/// numbers to doubles, and `{"symbol": "name"}` to a symbol.
pub(crate) fn json_value(heap: &Heap, json: &serde_json::Value) -> Result<Value> {
	let value = match json {
		serde_json::Value::Null | serde_json::Value::Bool(false) => heap.make_nil(),
		serde_json::Value::Bool(true) => heap.make_true(),
		serde_json::Value::Number(number) => match number.as_i64().and_then(|item| i32::try_from(item).ok()) {
			Some(small) => heap.make_integer(small),
			None => heap.make_double(number.as_f64().unwrap_or(f64::NAN)),
		},
		serde_json::Value::String(text) => heap.make_str(text),
		serde_json::Value::Array(items) => {
			let items = items.iter().map(|item| json_value(heap, item)).collect::<Result<Vec<_>>>()?;
			heap.make_list(items)
		}
		serde_json::Value::Object(fields) => match (fields.len(), fields.get("symbol")) {
			(1, Some(serde_json::Value::String(name))) => heap.make_symbol(name),
			_ => {
				return Err(CliError::InvalidInput {
					reason: format!("objects must have the form {{\"symbol\": \"name\"}}, got {json}"),
				});
			}
		},
	};
	Ok(value)
}
