use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;

use crate::config::types::RewriteRule;
use crate::error::{Result, SimgenError};
use crate::glob;

/// A path-rewrite rule compiled for application.
///
/// The `from` grouped glob becomes an unanchored find regex; `to` may embed
/// positional back-references (`$1`, `${1}`) to the pattern's groups.
#[derive(Debug)]
pub struct CompiledRewrite {
	/// Compiled find pattern.
	pub pattern: Regex,

	/// Replacement template.
	pub replacement: String,
}

impl CompiledRewrite {
	/// Compile a rewrite rule through the grouped-glob engine.
	pub fn from_rule(rule: &RewriteRule) -> Result<Self> {
		let compiled = glob::compile(&rule.from)?;
		Ok(CompiledRewrite {
			pattern: compiled.match_regex,
			replacement: rule.to.clone(),
		})
	}

	/// Apply this rewrite, replacing the first match. A rule that does not
	/// match leaves the input unchanged.
	pub fn apply(&self, input: &str) -> String {
		self.pattern
			.replace(input, self.replacement.as_str())
			.to_string()
	}
}

/// Compile an ordered rule list.
pub fn compile_rewrites(rules: &[RewriteRule]) -> Result<Vec<CompiledRewrite>> {
	rules.iter().map(CompiledRewrite::from_rule).collect()
}

/// Rewrite a path through the rule list.
///
/// The rules are an explicit left-fold: each rule consumes the previous
/// rule's output, so later rules may target text introduced by earlier
/// replacements. Rule authors who want an idempotent list must keep each
/// rule's output out of the other rules' pattern language; nothing here
/// guards against re-matching.
///
/// With no rules, falls back to the path relative to `working_dir`.
pub fn rewrite_path(input: &str, rewrites: &[CompiledRewrite], working_dir: &Path) -> String {
	if rewrites.is_empty() {
		return relative_to(input, working_dir);
	}

	rewrites
		.iter()
		.fold(input.to_string(), |current, rewrite| rewrite.apply(&current))
}

/// Default rewrite: the path relative to the working-directory root, or the
/// input unchanged when it lives outside it.
fn relative_to(input: &str, working_dir: &Path) -> String {
	match Path::new(input).strip_prefix(working_dir) {
		Ok(relative) => relative.to_string_lossy().to_string(),
		Err(_) => input.to_string(),
	}
}

/// Expand `${NAME}` placeholders from the log's environment assignments.
///
/// A placeholder naming an unset variable is a fatal error; an unterminated
/// `${` is kept literally.
pub fn expand_placeholders(input: &str, env: &BTreeMap<String, String>) -> Result<String> {
	let mut expanded = String::with_capacity(input.len());
	let mut rest = input;

	while let Some(start) = rest.find("${") {
		expanded.push_str(&rest[..start]);
		let after = &rest[start + 2..];
		let Some(close) = after.find('}') else {
			expanded.push_str(&rest[start..]);
			return Ok(expanded);
		};
		let name = &after[..close];
		match env.get(name) {
			Some(value) => expanded.push_str(value),
			None => {
				return Err(SimgenError::MissingEnvVar {
					name: name.to_string(),
				});
			}
		}
		rest = &after[close + 1..];
	}

	expanded.push_str(rest);
	Ok(expanded)
}
