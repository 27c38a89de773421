use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all portman operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PortmanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed configuration (e.g. portman.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your portman.toml for syntax errors"))]
    Config { message: String },

    /// A package reference carried an empty `[]` feature list.
    #[error("Package `{package}` has an empty feature list")]
    #[diagnostic(help("Drop the brackets to request the default `core` feature"))]
    EmptyFeatureList { package: String },

    /// A package reference could not be parsed at all.
    #[error("Invalid package reference `{input}`: {reason}")]
    InvalidPackageRef { input: String, reason: String },

    /// The installed package conflicts with the requested feature set and
    /// must be removed before resolution can succeed.
    #[error("Feature mismatch for installed package `{package}`")]
    #[diagnostic(help("Remove `{package}` and resolve again"))]
    FeatureConflict { package: String },

    /// The dependency query for a package produced no usable answer.
    #[error("Dependency query for `{package}` failed: {message}")]
    QueryFailed { package: String, message: String },

    /// A single-feature package is not described by its port.
    #[error("Unknown feature `{package}`")]
    UnknownFeature { package: String },

    /// The external package tool failed.
    #[error("Package tool error: {message}")]
    Tool { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PortmanResult<T> = miette::Result<T>;
