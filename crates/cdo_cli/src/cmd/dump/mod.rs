use std::path::PathBuf;

use cdo::defs::{OffsetBase, RedefinePolicy, Runtime, RuntimeConfig};

use crate::cmd::util::{emit_json, value_json};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// Containers to load, in order; later files layer over earlier ones.
	#[arg(required = true)]
	pub paths: Vec<PathBuf>,
	#[arg(long)]
	pub json: bool,
	/// Fail when a container redefines an existing name.
	#[arg(long = "reject-redefinition")]
	pub reject_redefinition: bool,
	/// Treat entry offsets as absolute buffer positions.
	#[arg(long = "absolute-offsets")]
	pub absolute_offsets: bool,
	/// Print only this definition.
	#[arg(long)]
	pub name: Option<String>,
}

/// Load containers into a fresh runtime and print the resulting global table.
pub fn run(args: Args) -> Result<()> {
	let Args {
		paths,
		json,
		reject_redefinition,
		absolute_offsets,
		name,
	} = args;

	let config = RuntimeConfig {
		redefine: if reject_redefinition { RedefinePolicy::Reject } else { RedefinePolicy::Replace },
		offset_base: if absolute_offsets { OffsetBase::Buffer } else { OffsetBase::DataRegion },
		..RuntimeConfig::default()
	};
	let mut runtime = Runtime::new(config);

	for path in &paths {
		let result = runtime.load_only(path);
		if let Some(err) = result.error() {
			return Err(CliError::Load {
				path: path.display().to_string(),
				message: err.message.to_string(),
			});
		}
		runtime.release(result);
	}

	let globals = runtime.globals();
	let names: Vec<&str> = match name.as_deref() {
		Some(only) if globals.contains(only) => vec![only],
		Some(only) => {
			return Err(CliError::InvalidInput {
				reason: format!("{only} is not defined"),
			});
		}
		None => globals.names(),
	};

	let entries: Vec<EntryJson> = names
		.into_iter()
		.filter_map(|key| globals.get(key).map(|value| (key, value)))
		.map(|(key, value)| EntryJson {
			name: key.to_owned(),
			kind: value.kind_label(),
			value: value_json(value),
			text: value.to_string(),
		})
		.collect();

	if json {
		return emit_json(&DumpJson {
			defined: globals.len(),
			entries,
		});
	}

	for entry in &entries {
		println!("{} = {}", entry.name, entry.text);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct DumpJson {
	defined: usize,
	entries: Vec<EntryJson>,
}

#[derive(serde::Serialize)]
struct EntryJson {
	name: String,
	kind: &'static str,
	value: serde_json::Value,
	#[serde(skip)]
	text: String,
}
