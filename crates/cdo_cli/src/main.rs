#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "cdo", about = "Definition container inspection tools")]
struct Cli {
	/// Log loader activity to stderr.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Show header, offset table and name table.
	Info(cmd::info::Args),
	/// Load containers into a runtime and print every definition.
	Dump(cmd::dump::Args),
	/// Build a container from a JSON object of definitions.
	Pack(cmd::pack::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: bool) {
	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN })
		.with_writer(std::io::stderr)
		.finish();

	if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
		eprintln!("warning: tracing already initialized: {err}");
	}
}

fn run(command: Commands) -> cmd::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Pack(args) => cmd::pack::run(args),
	}
}
