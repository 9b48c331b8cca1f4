//! Run-log discovery across configured search locations.
//!
//! This module handles:
//! - Resolving search locations against the base directory, `~`, or `/`
//! - Deterministic filesystem traversal filtered by the search glob
//! - Display labels recovered from the pattern's capture groups
//! - Merging duplicate paths found by several locations

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SimgenError};
use crate::glob;

/// Separator between labels merged onto one discovered path.
pub const LABEL_SEPARATOR: &str = " • ";

/// Separator between a single pattern's captured groups.
const GROUP_SEPARATOR: &str = " - ";

/// A run log found by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLog {
	pub path: PathBuf,
	pub display_name: String,
}

/// Discover run logs under the configured search locations.
///
/// Locations are processed in declared order and each location's matches in
/// sorted traversal order, so repeated runs over the same tree produce the
/// same list. A path matched by several locations keeps its first entry and
/// collects the additional labels.
pub fn discover_logs(
	base_dir: &Path,
	locations: &[String],
	excludes: &[String],
) -> Result<Vec<DiscoveredLog>> {
	let mut exclude_filters = Vec::new();
	for exclude in excludes {
		let compiled = glob::compile(exclude)?;
		let resolved = resolve_glob(base_dir, &compiled.search_glob)?;
		exclude_filters.push(anchored_filter(&resolved)?);
	}

	let mut logs: Vec<DiscoveredLog> = Vec::new();
	for location in locations {
		let compiled = glob::compile(location)?;
		let resolved = resolve_glob(base_dir, &compiled.search_glob)?;
		let filter = anchored_filter(&resolved)?;
		let labeler = label_regex(location)?;

		for path in matching_files(&walk_root(&resolved), &filter) {
			let path_str = path.to_string_lossy();
			if exclude_filters.iter().any(|f| f.is_match(&path_str)) {
				continue;
			}
			let display_name = label_for(&path_str, &labeler);
			merge(&mut logs, path, display_name);
		}
	}

	debug!(count = logs.len(), "discovered run logs");
	Ok(logs)
}

/// Resolve a search glob to an absolute one: `/` patterns are used as-is,
/// `~` patterns expand to the home directory, anything else is relative to
/// the base directory.
fn resolve_glob(base_dir: &Path, search_glob: &str) -> Result<String> {
	if search_glob.starts_with('/') {
		Ok(search_glob.to_string())
	} else if let Some(rest) = search_glob.strip_prefix('~') {
		let home = dirs::home_dir().ok_or(SimgenError::HomeDirectoryNotFound)?;
		Ok(format!("{}{}", home.to_string_lossy(), rest))
	} else {
		Ok(format!("{}/{}", base_dir.to_string_lossy(), search_glob))
	}
}

/// Full-path filter for a resolved glob.
fn anchored_filter(resolved_glob: &str) -> Result<Regex> {
	let source = format!("^{}$", glob::glob_to_regex_fragment(resolved_glob));
	Regex::new(&source).map_err(|source| SimgenError::InvalidRegex {
		pattern: resolved_glob.to_string(),
		source,
	})
}

/// Directory to start walking from: the static prefix before the first
/// wildcard character.
fn walk_root(resolved_glob: &str) -> PathBuf {
	let wildcard = resolved_glob
		.find(['*', '?', '['])
		.unwrap_or(resolved_glob.len());
	let prefix = &resolved_glob[..wildcard];
	match prefix.rfind('/') {
		Some(0) => PathBuf::from("/"),
		Some(index) => PathBuf::from(&prefix[..index]),
		None => PathBuf::from("."),
	}
}

/// Files under `root` whose full path matches `filter`, in sorted order.
/// Unreadable directory entries are skipped.
fn matching_files(root: &Path, filter: &Regex) -> Vec<PathBuf> {
	WalkDir::new(root)
		.sort_by_file_name()
		.into_iter()
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.file_type().is_file())
		.filter(|entry| filter.is_match(&entry.path().to_string_lossy()))
		.map(|entry| entry.path().to_path_buf())
		.collect()
}

/// Label regex for a location: the location with its leading dots or `~`
/// stripped, compiled for unanchored matching against discovered paths.
fn label_regex(location: &str) -> Result<Regex> {
	let trimmed = location.trim_start_matches(['.', '~']);
	Ok(glob::compile(trimmed)?.match_regex)
}

/// Display label for one match: captured groups joined, or the full path
/// when the pattern captures nothing.
fn label_for(path_str: &str, labeler: &Regex) -> String {
	match labeler.captures(path_str) {
		Some(captures) if captures.len() > 1 => {
			let groups: Vec<&str> = captures
				.iter()
				.skip(1)
				.flatten()
				.map(|m| m.as_str())
				.collect();
			groups.join(GROUP_SEPARATOR)
		}
		_ => path_str.to_string(),
	}
}

/// Merge one match into the discovered set, preserving first-seen order.
fn merge(logs: &mut Vec<DiscoveredLog>, path: PathBuf, display_name: String) {
	if let Some(existing) = logs.iter_mut().find(|log| log.path == path) {
		existing.display_name.push_str(LABEL_SEPARATOR);
		existing.display_name.push_str(&display_name);
	} else {
		logs.push(DiscoveredLog { path, display_name });
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn touch(path: &Path) {
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, "").unwrap();
	}

	fn fixture() -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		touch(&dir.path().join("build/alpha/logs/run.log"));
		touch(&dir.path().join("build/beta/logs/run.log"));
		touch(&dir.path().join("build/beta/logs/notes.txt"));
		dir
	}

	#[test]
	fn test_discovers_matching_files_with_labels() {
		let dir = fixture();
		let logs = discover_logs(
			dir.path(),
			&["build/(*)/logs/(*).log".to_string()],
			&[],
		)
		.unwrap();

		assert_eq!(logs.len(), 2);
		assert_eq!(logs[0].display_name, "alpha - run");
		assert_eq!(logs[1].display_name, "beta - run");
		assert!(logs[0].path.ends_with("build/alpha/logs/run.log"));
	}

	#[test]
	fn test_pattern_without_groups_labels_with_full_path() {
		let dir = fixture();
		let logs = discover_logs(
			dir.path(),
			&["build/alpha/logs/run.log".to_string()],
			&[],
		)
		.unwrap();

		assert_eq!(logs.len(), 1);
		assert_eq!(logs[0].display_name, logs[0].path.to_string_lossy());
	}

	#[test]
	fn test_duplicate_location_merges_labels() {
		let dir = fixture();
		let location = "build/(*)/logs/run.log".to_string();
		let logs = discover_logs(dir.path(), &[location.clone(), location], &[]).unwrap();

		assert_eq!(logs.len(), 2);
		assert_eq!(logs[0].display_name, "alpha • alpha");
	}

	#[test]
	fn test_overlapping_locations_keep_first_seen_order() {
		let dir = fixture();
		let logs = discover_logs(
			dir.path(),
			&[
				"build/beta/logs/(*).log".to_string(),
				"build/(*)/logs/run.log".to_string(),
			],
			&[],
		)
		.unwrap();

		// beta/run.log first (first location), then alpha from the second.
		assert_eq!(logs.len(), 2);
		assert!(logs[0].path.ends_with("build/beta/logs/run.log"));
		assert_eq!(logs[0].display_name, "run • beta");
		assert_eq!(logs[1].display_name, "alpha");
	}

	#[test]
	fn test_excluded_paths_are_dropped() {
		let dir = fixture();
		let logs = discover_logs(
			dir.path(),
			&["build/(*)/logs/(*).log".to_string()],
			&["build/beta/**".to_string()],
		)
		.unwrap();

		assert_eq!(logs.len(), 1);
		assert_eq!(logs[0].display_name, "alpha - run");
	}

	#[test]
	fn test_nonexistent_search_root_yields_no_logs() {
		let dir = tempfile::tempdir().unwrap();
		let logs = discover_logs(
			dir.path(),
			&["missing/(*)/run.log".to_string()],
			&[],
		)
		.unwrap();
		assert!(logs.is_empty());
	}

	#[test]
	fn test_invalid_location_pattern_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = discover_logs(dir.path(), &["build/()(/run.log".to_string()], &[]);
		assert!(result.is_err());
	}

	#[test]
	fn test_walk_root_stops_at_first_wildcard() {
		assert_eq!(walk_root("/a/b/*/run.log"), PathBuf::from("/a/b"));
		assert_eq!(walk_root("/a/b/run?.log"), PathBuf::from("/a/b"));
		assert_eq!(walk_root("/a/b/run.log"), PathBuf::from("/a/b"));
		assert_eq!(walk_root("/*.log"), PathBuf::from("/"));
	}
}
