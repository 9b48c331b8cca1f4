//! Line transformation and filtering for extracted command blocks.
//!
//! This module handles:
//! - Path normalization of file-location lines
//! - Nested-file directives replaced by stand-in comments
//! - The directive allow-list and bare-path heuristic
//! - The skip policy for directives omitted from the output

use std::path::Path;

use regex::Regex;

use crate::error::{Result, SimgenError};
use crate::glob;
use crate::rules::{CompiledRewrite, rewrite_path};

/// Lines carrying a file location: an optional include-dir prefix followed
/// by an absolute path, nothing else.
const LOCATION_PATTERN: &str = r"^(\+incdir\+)?(/[\w/.]+)$";

/// Directive whose argument is a nested command file.
const NESTED_FILE_PREFIX: &str = "-f ";

/// Policy for directives whose lines are omitted from the generated file.
#[derive(Debug, Default)]
pub struct SkipPolicy {
	patterns: Vec<Regex>,
	delete_skipped: bool,
	note_deleted: bool,
}

impl SkipPolicy {
	/// Compile the skip-directive list. Each directive matches any line it
	/// prefixes (the pattern is the directive followed by `**`, anchored).
	pub fn compile(directives: &[String], delete_skipped: bool, note_deleted: bool) -> Result<Self> {
		let patterns = directives
			.iter()
			.map(|directive| glob::compile_anchored(&format!("{directive}**")))
			.collect::<Result<Vec<_>>>()?;

		Ok(SkipPolicy {
			patterns,
			delete_skipped,
			note_deleted,
		})
	}

	fn matches(&self, line: &str) -> bool {
		self.patterns.iter().any(|pattern| pattern.is_match(line))
	}
}

/// Transforms raw command lines into build-file lines, one at a time.
///
/// Each input line maps to at most one output line; dropped lines leave no
/// placeholder. The only multi-line output is the nested-file stand-in,
/// which carries a leading blank line.
#[derive(Debug)]
pub struct LineTransformer<'a> {
	location: Regex,
	rewrites: &'a [CompiledRewrite],
	working_dir: &'a Path,
	directive_prefixes: &'a [String],
	skip: SkipPolicy,
}

impl<'a> LineTransformer<'a> {
	pub fn new(
		rewrites: &'a [CompiledRewrite],
		working_dir: &'a Path,
		directive_prefixes: &'a [String],
		skip: SkipPolicy,
	) -> Result<Self> {
		let location = Regex::new(LOCATION_PATTERN).map_err(|source| SimgenError::InvalidRegex {
			pattern: LOCATION_PATTERN.to_string(),
			source,
		})?;

		Ok(LineTransformer {
			location,
			rewrites,
			working_dir,
			directive_prefixes,
			skip,
		})
	}

	/// Transform one raw line; `None` drops the line.
	pub fn transform(&self, raw: &str) -> Option<String> {
		let trimmed = raw.trim();
		let mut line = trimmed.to_string();

		// Normalize lines that carry a file location, keeping the prefix.
		if let Some(captures) = self.location.captures(trimmed) {
			let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
			let location = &captures[2];
			line = format!(
				"{prefix}{}",
				rewrite_path(location, self.rewrites, self.working_dir)
			);
		}

		// A nested command file is not expanded; a comment stands in for
		// its content.
		if let Some(included) = line.strip_prefix(NESTED_FILE_PREFIX) {
			line = format!("\n# Content from {included}");
		} else if !self.is_recognized(&line) {
			return None;
		}

		if self.skip.delete_skipped && self.skip.matches(&line) {
			if self.skip.note_deleted {
				return Some(format!("# Removed (source deleted): {line}"));
			}
			return None;
		}

		Some(line)
	}

	/// Allow-list check: configured directive prefixes (which include the
	/// comment markers) or the bare file-path heuristic.
	fn is_recognized(&self, line: &str) -> bool {
		if line.is_empty() {
			return false;
		}
		if self
			.directive_prefixes
			.iter()
			.any(|prefix| line.starts_with(prefix.as_str()))
		{
			return true;
		}
		looks_like_file_path(line)
	}
}

/// Heuristic for lines that are a bare file path: no embedded space, a
/// dotted extension, and no leading flag symbol.
fn looks_like_file_path(line: &str) -> bool {
	if line.contains(' ') || line.starts_with('-') || line.starts_with('+') {
		return false;
	}

	let name = line.rsplit('/').next().unwrap_or(line);
	match name.rsplit_once('.') {
		Some((stem, extension)) => {
			!stem.is_empty()
				&& !extension.is_empty()
				&& extension.chars().all(|c| c.is_ascii_alphanumeric())
		}
		None => false,
	}
}
