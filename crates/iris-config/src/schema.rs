//! Raw serde schema for field-definition files.
//!
//! These types mirror the TOML layout one-to-one and carry no
//! validation of their own; [`loader`](crate::loader) converts them to
//! the core model, where all semantic checks happen.

use iris_core::{CardinalityTier, GeneratorKind, SourceKind};
use serde::Deserialize;

/// Top-level file layout: a list of `[[fields]]` tables.
#[derive(Debug, Deserialize)]
pub(crate) struct FieldsFile {
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// One `[[fields]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawField {
    pub name: String,
    pub inbound: Option<RawInbound>,
    pub response: Option<RawResponse>,
    pub downstream_request: Option<RawDownstreamRequest>,
    pub downstream_response: Option<RawDownstreamResponse>,
    #[serde(default)]
    pub sensitive: bool,
    pub mask: Option<String>,
    pub observability: Option<RawObservability>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawInbound {
    pub kind: SourceKind,
    pub selector: String,
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub generate: Option<GeneratorKind>,
    pub fallback: Option<Box<RawFallback>>,
    pub validation: Option<String>,
    pub transform: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawFallback {
    pub kind: SourceKind,
    pub selector: String,
    pub fallback: Option<Box<RawFallback>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawResponse {
    pub kind: SourceKind,
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDownstreamRequest {
    pub kind: SourceKind,
    pub key: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDownstreamResponse {
    pub kind: SourceKind,
    pub selector: String,
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawObservability {
    pub log_key: Option<String>,
    pub metric: Option<RawMetric>,
    pub span_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawMetric {
    pub tag: String,
    pub cardinality: CardinalityTier,
}
