//! Configuration loading errors.

use thiserror::Error;

/// Errors that can occur while loading a field-definition file.
///
/// All variants are startup-fatal, matching the rest of the
/// configuration error taxonomy: nothing here can surface at request
/// time.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("failed to read field definitions: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse field definitions: {0}")]
    Parse(#[from] toml::de::Error),

    /// The definitions parsed but failed semantic validation.
    #[error(transparent)]
    Invalid(#[from] iris_core::ConfigError),

    /// A transform expression did not parse.
    #[error("field '{field}': {source}")]
    InvalidTransform {
        /// The offending field name.
        field: String,
        /// The parse error.
        #[source]
        source: iris_core::TransformParseError,
    },
}
