pub mod ops_bootstrap;
pub mod ops_install;
pub mod ops_plan;
pub mod ops_ports;
pub mod settings;

pub use settings::{Overrides, Settings};
