//! Shared utilities for portman.
//!
//! This crate provides cross-cutting concerns used by all other portman crates:
//! the error type, filesystem helpers, process spawning, and terminal status
//! output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;

use std::path::{Path, PathBuf};

/// Returns the path to the portman data directory (`~/.portman/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".portman")
}
