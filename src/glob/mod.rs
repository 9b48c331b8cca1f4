//! Grouped-glob pattern compilation.
//!
//! This module handles:
//! - Validation of glob patterns with parenthesized capture groups
//! - The dual compiled outputs: a plain search glob and a label regex
//! - Glob-to-regex translation shared by both outputs

pub mod grouped;
pub mod translate;

pub use grouped::{CompiledPattern, compile, compile_anchored};
pub use translate::glob_to_regex_fragment;
