//! Build-file assembly.
//!
//! This module handles:
//! - The `.dvt` project-marker check
//! - Orchestration of extraction, rewriting, and line transformation
//! - Document concatenation and the final write

pub mod template;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::types::RewriteRule;
use crate::config::Config;
use crate::error::{Result, SimgenError};
use crate::extract::{self, Anchors};
use crate::rules::{self, CompiledRewrite};
use crate::transform::{LineTransformer, SkipPolicy};

/// Project marker directory; the generated file lands inside it.
pub const MARKER_DIR: &str = ".dvt";

/// Extension of the generated configuration file.
pub const BUILD_FILE_EXTENSION: &str = "build";

/// One generation request, fully resolved.
#[derive(Debug)]
pub struct GenerateOptions<'a> {
	/// Project base directory, holding the `.dvt` marker.
	pub base_dir: &'a Path,

	/// The selected run log.
	pub log_path: &'a Path,

	/// Base name of the generated file (without extension).
	pub build_name: &'a str,

	/// Effective configuration.
	pub config: &'a Config,

	/// Generation time stamped into the header. Injected so tests can
	/// freeze it.
	pub generated_at: DateTime<Local>,
}

/// Generate the build configuration document and write it under the
/// project's `.dvt` directory. Returns the written path.
///
/// Any failure aborts the whole request; no partial document is written.
pub fn generate_build_file(options: &GenerateOptions) -> Result<PathBuf> {
	let marker = options.base_dir.join(MARKER_DIR);
	if !marker.is_dir() {
		return Err(SimgenError::ProjectMarkerNotFound {
			path: options.base_dir.to_path_buf(),
		});
	}

	let log_text =
		fs::read_to_string(options.log_path).map_err(|source| SimgenError::LogReadError {
			path: options.log_path.to_path_buf(),
			source,
		})?;

	let block = extract::extract(&log_text, &Anchors::xrun())?;

	for name in &options.config.env_vars {
		if !block.env.contains_key(name) {
			return Err(SimgenError::MissingEnvVar { name: name.clone() });
		}
	}

	let rewrites = compile_rewrites_with_env(&options.config.rewrites, &block.env)?;
	let skip = SkipPolicy::compile(
		&options.config.skip_directives,
		options.config.delete_skipped_directives,
		options.config.note_deleted_directives,
	)?;
	let transformer = LineTransformer::new(
		&rewrites,
		options.base_dir,
		&options.config.directive_prefixes,
		skip,
	)?;

	let mut body = String::new();
	if let Some(ref location) = block.auxiliary_location {
		body.push_str(&template::auxiliary_block(location));
	}
	for raw in &block.raw_lines {
		if let Some(line) = transformer.transform(raw) {
			body.push_str(&line);
			body.push('\n');
		}
	}
	debug!(lines = block.raw_lines.len(), "transformed command block");

	let header = template::header_text(
		options.log_path,
		options.base_dir,
		options.config.semantic_checks_timeout,
		&options.generated_at,
	);
	let footer = template::footer_text(&options.config.tops);
	let document = assemble_document(&header, &body, &footer);

	let build_path = marker.join(format!("{}.{}", options.build_name, BUILD_FILE_EXTENSION));
	fs::write(&build_path, &document).map_err(|source| SimgenError::BuildFileWriteError {
		path: build_path.clone(),
		source,
	})?;

	info!(path = %build_path.display(), "wrote build configuration");
	Ok(build_path)
}

/// Concatenate the three document parts with the fixed blank-line
/// separators. `body` carries one trailing newline per line.
pub fn assemble_document(header: &str, body: &str, footer: &str) -> String {
	format!("{header}\n\n{body}\n{footer}\n")
}

/// Expand `${NAME}` placeholders from the extracted env, then compile.
fn compile_rewrites_with_env(
	rules_config: &[RewriteRule],
	env: &BTreeMap<String, String>,
) -> Result<Vec<CompiledRewrite>> {
	let mut compiled = Vec::with_capacity(rules_config.len());
	for rule in rules_config {
		let expanded = RewriteRule {
			from: rules::expand_placeholders(&rule.from, env)?,
			to: rules::expand_placeholders(&rule.to, env)?,
		};
		compiled.push(CompiledRewrite::from_rule(&expanded)?);
	}
	Ok(compiled)
}
