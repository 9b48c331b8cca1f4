//! Configuration loading and parsing for simgen.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Project-then-user config lookup
//! - The init template

use std::path::{Path, PathBuf};

pub mod parser;
pub mod types;

pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, RewriteRule};

use crate::error::Result;

/// File name of the configuration, in the project base directory or `~`.
pub const CONFIG_FILE_NAME: &str = ".simgen.toml";

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The file it was loaded from; `None` when built-in defaults apply.
	pub path: Option<PathBuf>,
}

/// Load the configuration for a base directory.
///
/// The project's `.simgen.toml` wins; otherwise `~/.simgen.toml` is used;
/// otherwise the built-in defaults. There is no merging across levels.
pub fn load_config(base_dir: &Path) -> Result<LoadedConfig> {
	let project = base_dir.join(CONFIG_FILE_NAME);
	if project.exists() {
		return Ok(LoadedConfig {
			config: parse_config_file(&project)?,
			path: Some(project),
		});
	}

	if let Some(home) = dirs::home_dir() {
		let user = home.join(CONFIG_FILE_NAME);
		if user.exists() {
			return Ok(LoadedConfig {
				config: parse_config_file(&user)?,
				path: Some(user),
			});
		}
	}

	Ok(LoadedConfig {
		config: Config::default(),
		path: None,
	})
}

/// Template written by `simgen init`.
pub fn init_template() -> &'static str {
	r##"# simgen configuration.

# Grouped-glob search locations for run logs, in order. Parenthesized
# groups become the labels shown by `simgen list`.
search-locations = [
	"../build/(*)/_COMPILED_TESTBENCHES_/(*)/xlm/tb/run.log",
]

# Patterns whose matches are dropped from discovery.
# exclude-locations = ["../build/scratch/**"]

# Environment variables read from the log's setenv preamble. Rewrite
# rules may reference them as ${NAME}; a missing variable fails the run.
# env-vars = ["CHIPLET_NAME"]

# Path-rewrite rules, applied in order to each file-location line.
# Patterns may use grouped globs; replacements may use $1, $2, ...
# With no rules, paths are made relative to the base directory.
# [[rewrites]]
# from = "released/${CHIPLET_NAME}_cfg/soft_ip/"
# to = ""

# Directives whose lines are omitted from the generated file.
# skip-directives = ["-y", "-v"]
# delete-skipped-directives = true
# note-deleted-directives = false

# Top module names emitted in the generated footer.
tops = ["hw_top", "tb_top"]

semantic-checks-timeout = 90
"##
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_load_project_config() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join(CONFIG_FILE_NAME),
			"tops = [\"soc_top\"]\n",
		)
		.unwrap();

		let loaded = load_config(dir.path()).unwrap();
		assert_eq!(loaded.config.tops, vec!["soc_top"]);
		assert_eq!(loaded.path, Some(dir.path().join(CONFIG_FILE_NAME)));
	}

	#[test]
	fn test_load_defaults_without_config_file() {
		let dir = tempfile::tempdir().unwrap();
		let loaded = load_config(dir.path()).unwrap();
		// Either the defaults, or the developer's own ~/.simgen.toml when
		// one exists; in both cases the tool must not fail.
		assert!(!loaded.config.search_locations.is_empty());
	}

	#[test]
	fn test_init_template_parses_and_validates() {
		let template = init_template();
		let config = parse_config_str(template, Path::new("template.toml")).unwrap();
		assert_eq!(config.search_locations.len(), 1);
		assert_eq!(config.tops, vec!["hw_top", "tb_top"]);
	}
}
