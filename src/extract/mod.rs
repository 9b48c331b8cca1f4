//! Command-block extraction from run-log text.
//!
//! This module handles:
//! - Locating the anchor-delimited compiler command block
//! - Recovering the optional auxiliary library location
//! - Scraping `setenv` assignments from the log preamble

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::error::{MissingAnchor, Result, SimgenError};

/// Start anchor of the xrun command block: the tool name on its own line.
pub const XRUN_START_ANCHOR: &str = "xrun";

/// End anchor of the xrun command block.
pub const XRUN_END_ANCHOR: &str = "REBUILD";

const UVM_LOCATION_PATTERN: &str = r"using uvmhome location (\S+)";
const SETENV_PATTERN: &str = r"(?m)^setenv\s+(\w+)\s+'([^']*)'";

/// Anchor patterns bounding the command block in a log document.
#[derive(Debug, Clone)]
pub struct Anchors {
	/// Literal token that starts the block, matched as a whole line.
	pub start: String,

	/// Literal token that ends the block, matched anywhere after the start.
	pub end: String,

	/// Optional single-capture pattern for auxiliary metadata, searched
	/// anywhere in the document. Its absence is not an error.
	pub auxiliary: Option<String>,
}

impl Anchors {
	/// Anchors for xrun run logs.
	pub fn xrun() -> Self {
		Anchors {
			start: XRUN_START_ANCHOR.to_string(),
			end: XRUN_END_ANCHOR.to_string(),
			auxiliary: Some(UVM_LOCATION_PATTERN.to_string()),
		}
	}
}

/// The command block extracted from one log document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCommandBlock {
	/// Lines strictly between the two anchors, untrimmed.
	pub raw_lines: Vec<String>,

	/// First capture of the auxiliary pattern, when present.
	pub auxiliary_location: Option<String>,

	/// `setenv NAME 'value'` assignments from the log preamble.
	/// First assignment wins when a name repeats.
	pub env: BTreeMap<String, String>,
}

/// Extracts the first anchor-delimited command block from `log_text`.
///
/// Fails with `AnchorNotFound` naming the anchor that was missing. A start
/// anchor without a later end anchor is an error, never a truncated block.
/// Logs containing several command sections only have their first block
/// extracted.
pub fn extract(log_text: &str, anchors: &Anchors) -> Result<ExtractedCommandBlock> {
	let Some(block_start) = find_start_line(log_text, &anchors.start) else {
		let missing = if log_text.contains(&anchors.end) {
			MissingAnchor::Start(anchors.start.clone())
		} else {
			MissingAnchor::Both {
				start: anchors.start.clone(),
				end: anchors.end.clone(),
			}
		};
		return Err(SimgenError::AnchorNotFound { missing });
	};

	let rest = &log_text[block_start..];
	let Some(end_index) = rest.find(&anchors.end) else {
		return Err(SimgenError::AnchorNotFound {
			missing: MissingAnchor::End(anchors.end.clone()),
		});
	};

	let raw_lines: Vec<String> = rest[..end_index].lines().map(str::to_string).collect();

	let auxiliary_location = match &anchors.auxiliary {
		Some(pattern) => first_capture(pattern, log_text)?,
		None => None,
	};

	let env = extract_env(log_text)?;

	debug!(
		lines = raw_lines.len(),
		auxiliary = auxiliary_location.is_some(),
		env_vars = env.len(),
		"extracted command block"
	);

	Ok(ExtractedCommandBlock {
		raw_lines,
		auxiliary_location,
		env,
	})
}

/// Finds the byte offset just past the first line that equals `token`.
fn find_start_line(text: &str, token: &str) -> Option<usize> {
	let mut offset = 0;
	for line in text.split_inclusive('\n') {
		if line.trim_end_matches(['\n', '\r']) == token {
			return Some(offset + line.len());
		}
		offset += line.len();
	}
	None
}

/// First capture group of `pattern` in `text`, if any.
fn first_capture(pattern: &str, text: &str) -> Result<Option<String>> {
	let regex = compile_regex(pattern)?;
	Ok(regex
		.captures(text)
		.and_then(|captures| captures.get(1))
		.map(|m| m.as_str().to_string()))
}

/// Collects `setenv NAME 'value'` assignments from the document.
fn extract_env(text: &str) -> Result<BTreeMap<String, String>> {
	let regex = compile_regex(SETENV_PATTERN)?;
	let mut env = BTreeMap::new();
	for captures in regex.captures_iter(text) {
		env.entry(captures[1].to_string())
			.or_insert_with(|| captures[2].to_string());
	}
	Ok(env)
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| SimgenError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
