use serde::Deserialize;

use crate::error::Result;
use crate::glob;

/// Top-level configuration from a `.simgen.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Grouped-glob patterns searched for run logs, in order. Parenthesized
	/// groups become the display labels shown for each discovered log.
	#[serde(default = "default_search_locations")]
	pub search_locations: Vec<String>,

	/// Patterns whose matches are dropped from discovery.
	#[serde(default)]
	pub exclude_locations: Vec<String>,

	/// Path-rewrite rules, applied in order to each file-location line.
	#[serde(default)]
	pub rewrites: Vec<RewriteRule>,

	/// Directives whose lines are omitted when the skip policy is active.
	#[serde(default)]
	pub skip_directives: Vec<String>,

	/// Activates the skip policy.
	#[serde(default)]
	pub delete_skipped_directives: bool,

	/// Replace skipped lines with a note naming the deleted source.
	#[serde(default)]
	pub note_deleted_directives: bool,

	/// Allow-listed line prefixes kept in the generated file. Comment
	/// markers belong here too.
	#[serde(default = "default_directive_prefixes")]
	pub directive_prefixes: Vec<String>,

	/// Environment variables that must be present in the log preamble.
	/// Rewrite rules may reference them as `${NAME}`.
	#[serde(default)]
	pub env_vars: Vec<String>,

	/// Top module names emitted in the generated footer.
	#[serde(default = "default_tops")]
	pub tops: Vec<String>,

	/// Timeout for the downstream tool's semantic checks, in seconds.
	#[serde(default = "default_semantic_checks_timeout")]
	pub semantic_checks_timeout: u32,
}

/// A path-rewrite rule: a grouped-glob find pattern and its replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRule {
	/// Grouped-glob pattern to find.
	pub from: String,

	/// Replacement; may reference captured groups by position.
	#[serde(default)]
	pub to: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			search_locations: default_search_locations(),
			exclude_locations: Vec::new(),
			rewrites: Vec::new(),
			skip_directives: Vec::new(),
			delete_skipped_directives: false,
			note_deleted_directives: false,
			directive_prefixes: default_directive_prefixes(),
			env_vars: Vec::new(),
			tops: default_tops(),
			semantic_checks_timeout: default_semantic_checks_timeout(),
		}
	}
}

impl Config {
	/// Validate every pattern the config carries, so bad syntax surfaces
	/// before generation starts. Rewrite patterns holding `${NAME}`
	/// placeholders are checked after expansion instead.
	pub fn validate(&self) -> Result<()> {
		for location in self
			.search_locations
			.iter()
			.chain(self.exclude_locations.iter())
		{
			glob::compile(location)?;
		}

		for directive in &self.skip_directives {
			glob::compile(&format!("{directive}**"))?;
		}

		for rule in &self.rewrites {
			if !rule.from.contains("${") {
				glob::compile(&rule.from)?;
			}
		}

		Ok(())
	}
}

fn default_search_locations() -> Vec<String> {
	vec!["../build/(*)/_COMPILED_TESTBENCHES_/(*)/xlm/tb/run.log".to_string()]
}

fn default_directive_prefixes() -> Vec<String> {
	vec![
		"+incdir+".to_string(),
		"+define+".to_string(),
		"+dvt_".to_string(),
		"#".to_string(),
		"//".to_string(),
	]
}

fn default_tops() -> Vec<String> {
	vec!["hw_top".to_string(), "tb_top".to_string()]
}

fn default_semantic_checks_timeout() -> u32 {
	90
}
