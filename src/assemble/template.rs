use std::path::Path;

use chrono::{DateTime, Local};

const BANNER: &str =
	"# ------------------------------------------------------------------------------------";

/// Header of the generated document: a banner naming the originating log
/// and the generation time, followed by the fixed tool-init lines.
pub fn header_text(
	log_path: &Path,
	compilation_root: &Path,
	semantic_checks_timeout: u32,
	generated_at: &DateTime<Local>,
) -> String {
	let root = compilation_root.to_string_lossy();
	[
		BANNER.to_string(),
		"# This file has been automatically generated from the following log file:".to_string(),
		format!("# {}", log_path.display()),
		format!("# Generated at {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
		BANNER.to_string(),
		"+dvt_init+vcs.vlogan -sverilog".to_string(),
		"+dvt_init+ius.irun".to_string(),
		format!("+dvt_compilation_root+{root}"),
		format!("+dvt_semantic_checks_timeout+{semantic_checks_timeout}"),
		format!("+incdir+{root}"),
		BANNER.to_string(),
	]
	.join("\n")
}

/// Footer of the generated document: one `-top` line per configured top.
pub fn footer_text(tops: &[String]) -> String {
	let mut lines = vec!["# End lines".to_string()];
	for top in tops {
		lines.push(format!("-top {top}"));
	}
	lines.join("\n")
}

/// Inclusion block for the auxiliary library location recovered from the
/// log, prepended to the body when present.
pub fn auxiliary_block(location: &str) -> String {
	format!("# uvm\n+incdir+{location}/sv/src\n{location}/sv/src/uvm_pkg.sv\n\n")
}
