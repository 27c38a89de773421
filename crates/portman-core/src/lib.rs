//! Core data types for portman.
//!
//! This crate defines the values every other crate exchanges: package
//! references with their feature sets, parsed CONTROL files describing a
//! port's per-feature requirements, the project/global configuration and the
//! host triplet.
//!
//! This crate is intentionally free of process spawning and network I/O.

pub mod config;
pub mod control;
pub mod package_ref;
pub mod platform;
