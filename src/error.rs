use std::fmt;
use std::path::PathBuf;

/// Library-level structured errors for simgen.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum SimgenError {
	#[error("Cannot find a .dvt folder in {path}")]
	ProjectMarkerNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid glob pattern {pattern:?}: {reason}")]
	InvalidGlobPattern { pattern: String, reason: String },

	#[error("Invalid regex compiled from pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Could not find {missing} in the log file")]
	AnchorNotFound { missing: MissingAnchor },

	#[error("Could not find environment variable in the log file: {name}")]
	MissingEnvVar { name: String },

	#[error("Failed to read log file: {path}")]
	LogReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Cannot write to file: {path}")]
	BuildFileWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Which extraction anchor was not found in the log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingAnchor {
	Start(String),
	End(String),
	Both { start: String, end: String },
}

impl fmt::Display for MissingAnchor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MissingAnchor::Start(token) => write!(f, "start anchor {token:?}"),
			MissingAnchor::End(token) => write!(f, "end anchor {token:?}"),
			MissingAnchor::Both { start, end } => {
				write!(f, "start anchor {start:?} or end anchor {end:?}")
			}
		}
	}
}

/// Result type alias using SimgenError.
pub type Result<T> = std::result::Result<T, SimgenError>;
