//! Path-rewrite rules for simgen.
//!
//! This module handles:
//! - Compiling `from`/`to` rules through the grouped-glob engine
//! - Sequential rule application as an explicit fold
//! - `${NAME}` placeholder expansion from extracted log environments

pub mod rewriter;

pub use rewriter::{CompiledRewrite, compile_rewrites, expand_placeholders, rewrite_path};
