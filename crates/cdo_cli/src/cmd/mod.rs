use thiserror::Error;

/// Loaded-definition dump command.
pub mod dump;
/// Container layout command.
pub mod info;
/// JSON to container packing command.
pub mod pack;
/// Shared rendering helpers.
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Container or source failure.
	#[error(transparent)]
	Defs(#[from] cdo::defs::DefsError),
	/// Filesystem failure outside a byte source.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON input or output failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Runtime reported a load failure as an error value.
	#[error("{path}: {message}")]
	Load {
		/// Container path.
		path: String,
		/// Error value rendering.
		message: String,
	},
	/// JSON input does not describe a definition set.
	#[error("invalid definitions: {reason}")]
	InvalidInput {
		/// What was wrong.
		reason: String,
	},
}
