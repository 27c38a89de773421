//! Adapter to the vcpkg package manager.
//!
//! Everything that touches a vcpkg checkout lives here: invoking the binary
//! and interpreting its reports, answering the resolver's dependency
//! queries, downloading and bootstrapping a checkout, copying port overlays
//! and reading port descriptions.

pub mod bootstrap;
pub mod catalog;
pub mod output;
pub mod ports;
pub mod tool;

pub use catalog::ControlCatalog;
pub use tool::{PackageTool, Vcpkg};
