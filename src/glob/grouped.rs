use regex::Regex;

use crate::error::{Result, SimgenError};
use crate::glob::translate::glob_to_regex_fragment;

/// A grouped glob compiled into its dual outputs.
///
/// `search_glob` is the pattern with the parentheses stripped, usable for
/// filesystem search. `match_regex` is the equivalent regular expression
/// whose capture groups align positionally with the pattern's groups, used
/// to recover display labels from matched paths.
#[derive(Debug)]
pub struct CompiledPattern {
	/// The plain glob, with all group parentheses removed.
	pub search_glob: String,

	/// Unanchored regex with one capture group per parenthesized group.
	pub match_regex: Regex,

	/// Number of parenthesized groups in the source pattern.
	pub group_count: usize,
}

/// Compiles a grouped glob pattern.
///
/// Fails with `InvalidGlobPattern` when parentheses are unbalanced, or when
/// groups are adjacent, nested, or empty.
pub fn compile(pattern: &str) -> Result<CompiledPattern> {
	validate(pattern)?;

	let search_glob: String = pattern.chars().filter(|c| *c != '(' && *c != ')').collect();

	// Split at parenthesis boundaries; each fragment is translated on its
	// own and group fragments are wrapped in capturing parentheses. The
	// fragments are unanchored so they concatenate into one regex.
	let mut source = String::new();
	let mut fragment = String::new();
	let mut group_count = 0;
	for c in pattern.chars() {
		match c {
			'(' => {
				source.push_str(&glob_to_regex_fragment(&fragment));
				fragment.clear();
			}
			')' => {
				source.push('(');
				source.push_str(&glob_to_regex_fragment(&fragment));
				source.push(')');
				fragment.clear();
				group_count += 1;
			}
			c => fragment.push(c),
		}
	}
	source.push_str(&glob_to_regex_fragment(&fragment));

	let match_regex = Regex::new(&source).map_err(|source| SimgenError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})?;

	Ok(CompiledPattern {
		search_glob,
		match_regex,
		group_count,
	})
}

/// Compiles a grouped glob into a regex that must match the entire input.
pub fn compile_anchored(pattern: &str) -> Result<Regex> {
	let compiled = compile(pattern)?;
	let source = format!("^{}$", compiled.match_regex.as_str());
	Regex::new(&source).map_err(|source| SimgenError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Validates group syntax with a single scan over the pattern.
fn validate(pattern: &str) -> Result<()> {
	let mut in_group = false;
	let mut group_len = 0usize;
	let mut prev_close = false;

	for c in pattern.chars() {
		match c {
			'(' => {
				if in_group {
					return Err(invalid(pattern, "nested capture group"));
				}
				if prev_close {
					return Err(invalid(pattern, "adjacent capture groups"));
				}
				in_group = true;
				group_len = 0;
				prev_close = false;
			}
			')' => {
				if !in_group {
					return Err(invalid(pattern, "unbalanced parenthesis"));
				}
				if group_len == 0 {
					return Err(invalid(pattern, "empty capture group"));
				}
				in_group = false;
				prev_close = true;
			}
			_ => {
				if in_group {
					group_len += 1;
				}
				prev_close = false;
			}
		}
	}

	if in_group {
		return Err(invalid(pattern, "unbalanced parenthesis"));
	}

	Ok(())
}

fn invalid(pattern: &str, reason: &str) -> SimgenError {
	SimgenError::InvalidGlobPattern {
		pattern: pattern.to_string(),
		reason: reason.to_string(),
	}
}
