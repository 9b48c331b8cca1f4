//! Simgen - CLI tool for generating build configuration files from simulator run logs.
//!
//! This library provides the core functionality for simgen, including:
//! - Grouped-glob compilation for log discovery and display labels
//! - Command-block extraction from run-log text
//! - Path rewriting and line filtering
//! - Build-file assembly under the project's `.dvt` directory
//!
//! # Example
//!
//! ```no_run
//! use simgen_cli::config::load_config;
//! use simgen_cli::discover::discover_logs;
//!
//! let base_dir = std::env::current_dir().unwrap();
//! let loaded = load_config(&base_dir).unwrap();
//! let logs = discover_logs(
//!     &base_dir,
//!     &loaded.config.search_locations,
//!     &loaded.config.exclude_locations,
//! )
//! .unwrap();
//!
//! for log in &logs {
//!     println!("{}", log.display_name);
//! }
//! ```

pub mod assemble;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod glob;
pub mod rules;
pub mod transform;

pub use error::{Result, SimgenError};
