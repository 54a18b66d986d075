//! Error types for Iris.
//!
//! Two families of errors exist, and they are deliberately kept apart:
//!
//! - [`ConfigError`] — an invalid [`FieldDefinition`](crate::FieldDefinition)
//!   set (unsupported direction for a kind, fallback cycle, bad pattern).
//!   These are fatal at startup and can never occur at request time.
//! - [`ExtractionError`] — a per-request failure on a `required` field.
//!   These abort the current extraction phase with a client-visible
//!   validation error. Non-required failures never produce an error at
//!   all; they degrade to absent/default and are logged at debug level.

use crate::context::Phase;
use crate::field::{Capability, SourceKind};
use http::StatusCode;
use thiserror::Error;

/// Result type alias for fallible core operations.
pub type CoreResult<T> = Result<T, ExtractionError>;

/// A configuration problem detected while building a
/// [`FieldCatalog`](crate::FieldCatalog).
///
/// All variants are startup-fatal: a catalog that fails validation is
/// never handed to the request pipeline.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two field definitions share the same name.
    #[error("duplicate field definition: '{name}'")]
    DuplicateField {
        /// The duplicated field name.
        name: String,
    },

    /// A field name is empty.
    #[error("field definitions must have a non-empty name")]
    EmptyFieldName,

    /// A field declares a direction its source/target kind does not support
    /// (e.g. a Cookie field with downstream-request enrichment).
    #[error("field '{field}': source kind {kind} does not support {capability}")]
    UnsupportedDirection {
        /// The offending field name.
        field: String,
        /// The declared source/target kind.
        kind: SourceKind,
        /// The capability the declaration requires.
        capability: Capability,
    },

    /// A fallback chain revisits a `(kind, selector)` pair.
    #[error("field '{field}': fallback chain revisits {kind} selector '{selector}'")]
    FallbackCycle {
        /// The offending field name.
        field: String,
        /// The repeated source kind.
        kind: SourceKind,
        /// The repeated selector.
        selector: String,
    },

    /// A fallback chain exceeds the supported depth.
    #[error("field '{field}': fallback chain deeper than {limit} levels")]
    FallbackTooDeep {
        /// The offending field name.
        field: String,
        /// The maximum supported chain depth.
        limit: usize,
    },

    /// A validation pattern failed to compile.
    #[error("field '{field}': invalid validation pattern: {source}")]
    InvalidValidation {
        /// The offending field name.
        field: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A mask pattern failed to parse.
    #[error("field '{field}': invalid mask pattern: {detail}")]
    InvalidMask {
        /// The offending field name.
        field: String,
        /// What was wrong with the pattern.
        detail: String,
    },

    /// A source handler was registered twice for the same kind.
    #[error("handler already registered for source kind {kind}")]
    DuplicateHandler {
        /// The kind that was registered twice.
        kind: SourceKind,
    },
}

/// A per-request extraction failure on a `required` field.
///
/// Carries the field name and source kind so the host can render a
/// precise client-visible error, plus an HTTP status mapping in the
/// style of the rest of the platform.
///
/// # Example
///
/// ```rust
/// use iris_core::{ExtractionError, SourceKind};
/// use http::StatusCode;
///
/// let err = ExtractionError::missing_required("tenant_id", SourceKind::Header);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(err.to_string().contains("tenant_id"));
/// ```
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A required field resolved to absent after the full
    /// primary/fallback/default/generate chain.
    #[error("missing required field '{field}' from {kind}")]
    MissingRequired {
        /// The field that could not be resolved.
        field: String,
        /// The field's primary source kind.
        kind: SourceKind,
    },

    /// A resolved value did not match the field's validation pattern.
    #[error("field '{field}' failed validation against '{pattern}'")]
    ValidationFailed {
        /// The field whose value was rejected.
        field: String,
        /// The field's primary source kind.
        kind: SourceKind,
        /// The pattern the value was checked against.
        pattern: String,
    },

    /// An extraction phase was invoked after a later phase already ran.
    #[error("cannot run phase {requested} after {current}")]
    PhaseOrder {
        /// The phase the request is currently in.
        current: Phase,
        /// The earlier phase that was requested.
        requested: Phase,
    },
}

impl ExtractionError {
    /// Creates an error for a required field that resolved to absent.
    #[must_use]
    pub fn missing_required(field: impl Into<String>, kind: SourceKind) -> Self {
        Self::MissingRequired {
            field: field.into(),
            kind,
        }
    }

    /// Creates an error for a value that failed pattern validation.
    #[must_use]
    pub fn validation_failed(
        field: impl Into<String>,
        kind: SourceKind,
        pattern: impl Into<String>,
    ) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            kind,
            pattern: pattern.into(),
        }
    }

    /// Returns the field name this error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { field, .. } | Self::ValidationFailed { field, .. } => {
                Some(field)
            }
            Self::PhaseOrder { .. } => None,
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingRequired { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PhaseOrder { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "MISSING_FIELD",
            Self::ValidationFailed { .. } => "FIELD_VALIDATION_FAILED",
            Self::PhaseOrder { .. } => "PHASE_ORDER_VIOLATION",
        }
    }
}
