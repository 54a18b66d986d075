//! Field configuration model.
//!
//! A [`FieldDefinition`] is the static, process-wide description of one
//! named context field: where its value comes from on the inbound request,
//! whether it is echoed to the outbound response, which downstream systems
//! receive it, whether it is read back from downstream responses, and how
//! it is masked and observed.
//!
//! Definitions are assembled once at startup into a [`FieldCatalog`],
//! which validates the whole set (unique names, direction/kind
//! consistency, fallback termination, pattern compilation) so that no
//! configuration problem can surface at request time.

use crate::error::ConfigError;
use crate::mask::MaskPattern;
use crate::transform::TransformKind;
use crate::GeneratorKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Maximum supported depth of a fallback chain.
const MAX_FALLBACK_DEPTH: usize = 8;

/// The origin category of a field's value.
///
/// Each kind supports a fixed subset of the five handler operations; see
/// [`SourceKind::supports`]. Declaring a direction a kind cannot serve is
/// a startup-time [`ConfigError`], never a request-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An HTTP header.
    Header,
    /// A cookie from the `Cookie` request header.
    Cookie,
    /// A URL query parameter.
    Query,
    /// A claim on the authenticated principal (never read from the wire).
    Claim,
    /// A resolved path variable.
    Path,
    /// A JSON-path selection from a parsed body.
    Body,
}

impl SourceKind {
    /// Returns whether this kind implements the given handler operation.
    ///
    /// This is the capability matrix: cookies never leave the edge, query
    /// and path have no response/body analogue, claims are derived from
    /// validated authentication state and never re-serialized outward,
    /// and bodies are extract-only in both directions.
    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        use Capability::{
            EnrichDownstreamRequest, EnrichResponse, ExtractDownstreamResponse, ExtractInbound,
            ExtractInboundBody,
        };

        match self {
            Self::Header => !matches!(capability, ExtractInboundBody),
            Self::Cookie => matches!(capability, ExtractInbound | EnrichResponse),
            Self::Query => matches!(capability, ExtractInbound | EnrichDownstreamRequest),
            Self::Claim | Self::Path => matches!(capability, ExtractInbound),
            Self::Body => matches!(capability, ExtractInboundBody | ExtractDownstreamResponse),
        }
    }

    /// Returns the kind name as used in configuration and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Query => "query",
            Self::Claim => "claim",
            Self::Path => "path",
            Self::Body => "body",
        }
    }

    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> [SourceKind; 6] {
        [
            Self::Header,
            Self::Cookie,
            Self::Query,
            Self::Claim,
            Self::Path,
            Self::Body,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the five operations in the source-handler contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read a value from the inbound request (headers, cookies, query,
    /// claims, path variables).
    ExtractInbound,
    /// Read a value from the parsed inbound JSON body.
    ExtractInboundBody,
    /// Write a value onto the outbound response.
    EnrichResponse,
    /// Write a value onto an outgoing downstream request.
    EnrichDownstreamRequest,
    /// Read a value back from a downstream response.
    ExtractDownstreamResponse,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExtractInbound => "inbound extraction",
            Self::ExtractInboundBody => "inbound body extraction",
            Self::EnrichResponse => "response enrichment",
            Self::EnrichDownstreamRequest => "downstream request enrichment",
            Self::ExtractDownstreamResponse => "downstream response extraction",
        };
        f.write_str(name)
    }
}

/// An alternative source tried when the one before it yields absent.
///
/// Fallbacks carry only a lookup (kind + selector); defaults, generation,
/// validation, and transforms always belong to the owning
/// [`InboundSource`] and apply to whichever link in the chain produced
/// the value.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    /// Where to look.
    pub kind: SourceKind,
    /// The name or JSON-path expression to look up.
    pub selector: String,
    /// The next fallback, tried if this one is also absent.
    pub fallback: Option<Box<FallbackSource>>,
}

impl FallbackSource {
    /// Creates a fallback lookup with no further fallback.
    #[must_use]
    pub fn new(kind: SourceKind, selector: impl Into<String>) -> Self {
        Self {
            kind,
            selector: selector.into(),
            fallback: None,
        }
    }

    /// Chains another fallback after this one.
    #[must_use]
    pub fn then(mut self, next: FallbackSource) -> Self {
        self.fallback = Some(Box::new(next));
        self
    }
}

/// Where and how a field is read from the inbound request.
#[derive(Debug, Clone)]
pub struct InboundSource {
    kind: SourceKind,
    selector: String,
    default_value: Option<String>,
    required: bool,
    generate: Option<GeneratorKind>,
    fallback: Option<FallbackSource>,
    validation: Option<String>,
    transform: Option<TransformKind>,
}

impl InboundSource {
    /// Creates an inbound source reading `selector` from `kind`.
    #[must_use]
    pub fn new(kind: SourceKind, selector: impl Into<String>) -> Self {
        Self {
            kind,
            selector: selector.into(),
            default_value: None,
            required: false,
            generate: None,
            fallback: None,
            validation: None,
            transform: None,
        }
    }

    /// Sets a static default used when every source in the chain is absent.
    ///
    /// A default suppresses the required-field failure and takes
    /// precedence over generation.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the field required: resolution to absent aborts the phase.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Generates a value when the chain is absent and no default is set.
    #[must_use]
    pub fn generate(mut self, generator: GeneratorKind) -> Self {
        self.generate = Some(generator);
        self
    }

    /// Sets the fallback source tried when the primary is absent.
    #[must_use]
    pub fn fallback(mut self, fallback: FallbackSource) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Sets a regex the resolved value must match.
    #[must_use]
    pub fn validation(mut self, pattern: impl Into<String>) -> Self {
        self.validation = Some(pattern.into());
        self
    }

    /// Sets a transform applied to the resolved value.
    #[must_use]
    pub fn transform(mut self, transform: TransformKind) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns the primary source kind.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the primary selector.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the static default, if any.
    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the generator, if any.
    #[must_use]
    pub fn generator(&self) -> Option<GeneratorKind> {
        self.generate
    }

    /// Returns the head of the fallback chain, if any.
    #[must_use]
    pub fn fallback_chain(&self) -> Option<&FallbackSource> {
        self.fallback.as_ref()
    }

    /// Returns the validation pattern source, if any.
    #[must_use]
    pub fn validation_pattern(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Returns the transform, if any.
    #[must_use]
    pub fn value_transform(&self) -> Option<TransformKind> {
        self.transform
    }
}

/// How a field is echoed back to the original caller.
#[derive(Debug, Clone)]
pub struct ResponseEnrichment {
    /// Header or Cookie; everything else is rejected at catalog build.
    pub kind: SourceKind,
    /// The header or cookie name to set.
    pub key: String,
}

impl ResponseEnrichment {
    /// Creates a response enrichment target.
    #[must_use]
    pub fn new(kind: SourceKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// How a field is forwarded to downstream systems.
#[derive(Debug, Clone)]
pub struct DownstreamRequestEnrichment {
    /// Header or Query; everything else is rejected at catalog build.
    pub kind: SourceKind,
    /// The header or query-parameter name to set.
    pub key: String,
    /// Target system ids; empty means every system.
    pub target_systems: BTreeSet<String>,
}

impl DownstreamRequestEnrichment {
    /// Creates an enrichment sent to every downstream system.
    #[must_use]
    pub fn new(kind: SourceKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            target_systems: BTreeSet::new(),
        }
    }

    /// Restricts the enrichment to the named systems.
    #[must_use]
    pub fn targets<I, S>(mut self, systems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_systems = systems.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether this enrichment applies to the given system.
    #[must_use]
    pub fn applies_to(&self, system_id: &str) -> bool {
        self.target_systems.is_empty() || self.target_systems.contains(system_id)
    }
}

/// How a field is read back from a downstream response.
#[derive(Debug, Clone)]
pub struct DownstreamResponseExtraction {
    /// Header or Body; everything else is rejected at catalog build.
    pub kind: SourceKind,
    /// The header name or JSON-path expression to read.
    pub selector: String,
    /// Default stored when the response does not carry the value.
    pub default_value: Option<String>,
    /// Warn (never fail the request) when absent without a default.
    pub required: bool,
}

impl DownstreamResponseExtraction {
    /// Creates a downstream response extraction.
    #[must_use]
    pub fn new(kind: SourceKind, selector: impl Into<String>) -> Self {
        Self {
            kind,
            selector: selector.into(),
            default_value: None,
            required: false,
        }
    }

    /// Sets a default stored when the response omits the value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the extraction required: absence is logged as a warning.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Cardinality tier for metric tags.
///
/// Sinks use the tier to decide which tags are safe for their backend;
/// a high-cardinality tag (e.g. request id) is typically trace-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalityTier {
    /// Bounded, enumerable values (e.g. region, channel).
    Low,
    /// Larger but still bounded sets (e.g. tenant id).
    Medium,
    /// Unbounded values (e.g. request id, user id).
    High,
}

/// Metric emission settings for one field.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    /// The metric tag name.
    pub tag: String,
    /// The cardinality tier of the tag values.
    pub cardinality: CardinalityTier,
}

/// Observability emission settings for one field.
#[derive(Debug, Clone, Default)]
pub struct ObservabilitySpec {
    /// Key under which the field appears in structured logs.
    pub log_key: Option<String>,
    /// Metric tag settings, if the field is emitted as a metric tag.
    pub metric: Option<MetricSpec>,
    /// Key under which the field appears as a span tag.
    pub span_key: Option<String>,
}

impl ObservabilitySpec {
    /// Returns whether the field is emitted to any sink.
    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.log_key.is_some() || self.metric.is_some() || self.span_key.is_some()
    }
}

/// The complete static description of one named context field.
///
/// # Example
///
/// ```rust
/// use iris_core::{
///     DownstreamRequestEnrichment, FieldDefinition, GeneratorKind, InboundSource,
///     ResponseEnrichment, SourceKind,
/// };
///
/// let field = FieldDefinition::builder("request_id")
///     .inbound(
///         InboundSource::new(SourceKind::Header, "X-Request-ID")
///             .generate(GeneratorKind::Uuid),
///     )
///     .response(ResponseEnrichment::new(SourceKind::Header, "X-Request-ID"))
///     .downstream_request(DownstreamRequestEnrichment::new(
///         SourceKind::Header,
///         "X-Request-ID",
///     ))
///     .build();
///
/// assert_eq!(field.name(), "request_id");
/// assert!(!field.is_sensitive());
/// ```
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    name: String,
    inbound: Option<InboundSource>,
    response: Option<ResponseEnrichment>,
    downstream_request: Option<DownstreamRequestEnrichment>,
    downstream_response: Option<DownstreamResponseExtraction>,
    sensitive: bool,
    mask: Option<MaskPattern>,
    observability: ObservabilitySpec,
}

impl FieldDefinition {
    /// Starts building a field definition with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> FieldDefinitionBuilder {
        FieldDefinitionBuilder::new(name)
    }

    /// Returns the unique field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inbound source, if the field is read from requests.
    #[must_use]
    pub fn inbound(&self) -> Option<&InboundSource> {
        self.inbound.as_ref()
    }

    /// Returns the response enrichment target, if any.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseEnrichment> {
        self.response.as_ref()
    }

    /// Returns the downstream request enrichment, if any.
    #[must_use]
    pub fn downstream_request(&self) -> Option<&DownstreamRequestEnrichment> {
        self.downstream_request.as_ref()
    }

    /// Returns the downstream response extraction, if any.
    #[must_use]
    pub fn downstream_response(&self) -> Option<&DownstreamResponseExtraction> {
        self.downstream_response.as_ref()
    }

    /// Returns whether the field's value is sensitive.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Returns the mask pattern for sensitive values, if configured.
    #[must_use]
    pub fn mask(&self) -> Option<&MaskPattern> {
        self.mask.as_ref()
    }

    /// Returns the observability settings.
    #[must_use]
    pub fn observability(&self) -> &ObservabilitySpec {
        &self.observability
    }
}

/// Builder for [`FieldDefinition`].
#[derive(Debug)]
pub struct FieldDefinitionBuilder {
    name: String,
    inbound: Option<InboundSource>,
    response: Option<ResponseEnrichment>,
    downstream_request: Option<DownstreamRequestEnrichment>,
    downstream_response: Option<DownstreamResponseExtraction>,
    sensitive: bool,
    mask: Option<MaskPattern>,
    observability: ObservabilitySpec,
}

impl FieldDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inbound: None,
            response: None,
            downstream_request: None,
            downstream_response: None,
            sensitive: false,
            mask: None,
            observability: ObservabilitySpec::default(),
        }
    }

    /// Sets where the field is read from on the inbound request.
    #[must_use]
    pub fn inbound(mut self, source: InboundSource) -> Self {
        self.inbound = Some(source);
        self
    }

    /// Sets where the field is echoed on the outbound response.
    #[must_use]
    pub fn response(mut self, enrichment: ResponseEnrichment) -> Self {
        self.response = Some(enrichment);
        self
    }

    /// Sets how the field is forwarded to downstream systems.
    #[must_use]
    pub fn downstream_request(mut self, enrichment: DownstreamRequestEnrichment) -> Self {
        self.downstream_request = Some(enrichment);
        self
    }

    /// Sets how the field is read back from downstream responses.
    #[must_use]
    pub fn downstream_response(mut self, extraction: DownstreamResponseExtraction) -> Self {
        self.downstream_response = Some(extraction);
        self
    }

    /// Marks the field sensitive, masking it for observability sinks.
    #[must_use]
    pub fn sensitive(mut self, mask: Option<MaskPattern>) -> Self {
        self.sensitive = true;
        self.mask = mask;
        self
    }

    /// Sets the observability emission settings.
    #[must_use]
    pub fn observability(mut self, spec: ObservabilitySpec) -> Self {
        self.observability = spec;
        self
    }

    /// Finishes building the definition.
    ///
    /// The definition is not yet validated; validation happens when the
    /// set of definitions is assembled into a [`FieldCatalog`].
    #[must_use]
    pub fn build(self) -> FieldDefinition {
        FieldDefinition {
            name: self.name,
            inbound: self.inbound,
            response: self.response,
            downstream_request: self.downstream_request,
            downstream_response: self.downstream_response,
            sensitive: self.sensitive,
            mask: self.mask,
            observability: self.observability,
        }
    }
}

/// The validated, immutable set of all field definitions.
///
/// Built once at startup. Construction performs every configuration check
/// the spec requires so the request pipeline can assume a well-formed
/// catalog:
///
/// - field names are unique and non-empty;
/// - every declared direction is supported by its kind
///   ([`SourceKind::supports`]);
/// - fallback chains terminate (bounded depth, no revisited lookup);
/// - validation patterns compile.
///
/// # Example
///
/// ```rust
/// use iris_core::{
///     DownstreamRequestEnrichment, FieldCatalog, FieldDefinition, SourceKind,
/// };
///
/// // Cookies never leave the edge: this is rejected at startup.
/// let bad = FieldDefinition::builder("session")
///     .downstream_request(DownstreamRequestEnrichment::new(
///         SourceKind::Cookie,
///         "session",
///     ))
///     .build();
///
/// assert!(FieldCatalog::new(vec![bad]).is_err());
/// ```
#[derive(Debug)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
    by_name: HashMap<String, usize>,
    validators: HashMap<String, Regex>,
    needs_response_buffering: bool,
}

impl FieldCatalog {
    /// Validates the definitions and builds the catalog.
    pub fn new(definitions: Vec<FieldDefinition>) -> Result<Self, ConfigError> {
        let mut by_name = HashMap::with_capacity(definitions.len());
        let mut validators = HashMap::new();
        let mut needs_response_buffering = false;

        for (index, field) in definitions.iter().enumerate() {
            if field.name.is_empty() {
                return Err(ConfigError::EmptyFieldName);
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(ConfigError::DuplicateField {
                    name: field.name.clone(),
                });
            }

            Self::check_directions(field)?;
            Self::check_fallbacks(field)?;

            if let Some(pattern) = field.inbound().and_then(InboundSource::validation_pattern) {
                let regex = Regex::new(pattern).map_err(|source| {
                    ConfigError::InvalidValidation {
                        field: field.name.clone(),
                        source,
                    }
                })?;
                validators.insert(field.name.clone(), regex);
            }

            if field
                .downstream_response()
                .is_some_and(|e| e.kind == SourceKind::Body)
            {
                needs_response_buffering = true;
            }
        }

        tracing::debug!(
            fields = definitions.len(),
            buffering = needs_response_buffering,
            "field catalog validated"
        );

        Ok(Self {
            fields: definitions,
            by_name,
            validators,
            needs_response_buffering,
        })
    }

    fn check_directions(field: &FieldDefinition) -> Result<(), ConfigError> {
        let unsupported = |kind: SourceKind, capability: Capability| ConfigError::UnsupportedDirection {
            field: field.name.clone(),
            kind,
            capability,
        };

        if let Some(inbound) = field.inbound() {
            let capability = if inbound.kind() == SourceKind::Body {
                Capability::ExtractInboundBody
            } else {
                Capability::ExtractInbound
            };
            if !inbound.kind().supports(capability) {
                return Err(unsupported(inbound.kind(), capability));
            }
            let mut link = inbound.fallback_chain();
            while let Some(fallback) = link {
                let capability = if fallback.kind == SourceKind::Body {
                    Capability::ExtractInboundBody
                } else {
                    Capability::ExtractInbound
                };
                if !fallback.kind.supports(capability) {
                    return Err(unsupported(fallback.kind, capability));
                }
                link = fallback.fallback.as_deref();
            }
        }

        if let Some(response) = field.response() {
            if !response.kind.supports(Capability::EnrichResponse) {
                return Err(unsupported(response.kind, Capability::EnrichResponse));
            }
        }

        if let Some(downstream) = field.downstream_request() {
            if !downstream.kind.supports(Capability::EnrichDownstreamRequest) {
                return Err(unsupported(
                    downstream.kind,
                    Capability::EnrichDownstreamRequest,
                ));
            }
        }

        if let Some(extraction) = field.downstream_response() {
            if !extraction
                .kind
                .supports(Capability::ExtractDownstreamResponse)
            {
                return Err(unsupported(
                    extraction.kind,
                    Capability::ExtractDownstreamResponse,
                ));
            }
        }

        Ok(())
    }

    fn check_fallbacks(field: &FieldDefinition) -> Result<(), ConfigError> {
        let Some(inbound) = field.inbound() else {
            return Ok(());
        };

        let mut seen: HashSet<(SourceKind, &str)> = HashSet::new();
        seen.insert((inbound.kind(), inbound.selector()));

        let mut depth = 0usize;
        let mut link = inbound.fallback_chain();
        while let Some(fallback) = link {
            depth += 1;
            if depth > MAX_FALLBACK_DEPTH {
                return Err(ConfigError::FallbackTooDeep {
                    field: field.name.clone(),
                    limit: MAX_FALLBACK_DEPTH,
                });
            }
            if !seen.insert((fallback.kind, fallback.selector.as_str())) {
                return Err(ConfigError::FallbackCycle {
                    field: field.name.clone(),
                    kind: fallback.kind,
                    selector: fallback.selector.clone(),
                });
            }
            link = fallback.fallback.as_deref();
        }

        Ok(())
    }

    /// Looks up a field definition by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Returns all field definitions in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the compiled validation pattern for a field, if any.
    #[must_use]
    pub fn validator(&self, field_name: &str) -> Option<&Regex> {
        self.validators.get(field_name)
    }

    /// Fields with an inbound source.
    pub fn inbound_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.inbound().is_some())
    }

    /// Fields echoed onto the outbound response.
    pub fn response_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.response().is_some())
    }

    /// Fields forwarded to downstream systems.
    pub fn downstream_request_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.downstream_request().is_some())
    }

    /// Fields read back from downstream responses.
    pub fn downstream_response_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .filter(|f| f.downstream_response().is_some())
    }

    /// Whether any field reads a downstream response body.
    ///
    /// When false, the capture pipeline never buffers downstream bodies,
    /// avoiding the memory cost entirely.
    #[must_use]
    pub fn needs_response_buffering(&self) -> bool {
        self.needs_response_buffering
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_matrix() {
        use Capability::{
            EnrichDownstreamRequest, EnrichResponse, ExtractDownstreamResponse, ExtractInbound,
            ExtractInboundBody,
        };

        // Header: everything except inbound body.
        assert!(SourceKind::Header.supports(ExtractInbound));
        assert!(!SourceKind::Header.supports(ExtractInboundBody));
        assert!(SourceKind::Header.supports(EnrichResponse));
        assert!(SourceKind::Header.supports(EnrichDownstreamRequest));
        assert!(SourceKind::Header.supports(ExtractDownstreamResponse));

        // Cookie: edge-only.
        assert!(SourceKind::Cookie.supports(ExtractInbound));
        assert!(SourceKind::Cookie.supports(EnrichResponse));
        assert!(!SourceKind::Cookie.supports(EnrichDownstreamRequest));
        assert!(!SourceKind::Cookie.supports(ExtractDownstreamResponse));

        // Query: inbound plus downstream request.
        assert!(SourceKind::Query.supports(ExtractInbound));
        assert!(SourceKind::Query.supports(EnrichDownstreamRequest));
        assert!(!SourceKind::Query.supports(EnrichResponse));

        // Claim and Path: inbound only.
        assert!(SourceKind::Claim.supports(ExtractInbound));
        assert!(!SourceKind::Claim.supports(EnrichResponse));
        assert!(SourceKind::Path.supports(ExtractInbound));
        assert!(!SourceKind::Path.supports(EnrichDownstreamRequest));

        // Body: extract-only, both directions.
        assert!(!SourceKind::Body.supports(ExtractInbound));
        assert!(SourceKind::Body.supports(ExtractInboundBody));
        assert!(SourceKind::Body.supports(ExtractDownstreamResponse));
        assert!(!SourceKind::Body.supports(EnrichResponse));
    }

    #[test]
    fn test_catalog_rejects_cookie_downstream_enrichment() {
        let field = FieldDefinition::builder("session")
            .downstream_request(DownstreamRequestEnrichment::new(SourceKind::Cookie, "session"))
            .build();

        let err = FieldCatalog::new(vec![field]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedDirection {
                kind: SourceKind::Cookie,
                ..
            }
        ));
    }

    #[test]
    fn test_catalog_rejects_claim_response_enrichment() {
        let field = FieldDefinition::builder("user_id")
            .response(ResponseEnrichment::new(SourceKind::Claim, "X-User-ID"))
            .build();

        assert!(FieldCatalog::new(vec![field]).is_err());
    }

    #[test]
    fn test_catalog_rejects_duplicate_names() {
        let a = FieldDefinition::builder("request_id").build();
        let b = FieldDefinition::builder("request_id").build();

        let err = FieldCatalog::new(vec![a, b]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField { name } if name == "request_id"));
    }

    #[test]
    fn test_catalog_rejects_empty_name() {
        let field = FieldDefinition::builder("").build();
        assert!(matches!(
            FieldCatalog::new(vec![field]),
            Err(ConfigError::EmptyFieldName)
        ));
    }

    #[test]
    fn test_catalog_rejects_fallback_cycle() {
        // Header "a" -> Query "a" -> Header "a" revisits the primary lookup.
        let field = FieldDefinition::builder("correlated")
            .inbound(
                InboundSource::new(SourceKind::Header, "a").fallback(
                    FallbackSource::new(SourceKind::Query, "a")
                        .then(FallbackSource::new(SourceKind::Header, "a")),
                ),
            )
            .build();

        let err = FieldCatalog::new(vec![field]).unwrap_err();
        assert!(matches!(err, ConfigError::FallbackCycle { .. }));
    }

    #[test]
    fn test_catalog_rejects_invalid_validation_pattern() {
        let field = FieldDefinition::builder("tenant")
            .inbound(InboundSource::new(SourceKind::Header, "X-Tenant").validation("[unclosed"))
            .build();

        assert!(matches!(
            FieldCatalog::new(vec![field]),
            Err(ConfigError::InvalidValidation { .. })
        ));
    }

    #[test]
    fn test_catalog_compiles_validators() {
        let field = FieldDefinition::builder("tenant")
            .inbound(InboundSource::new(SourceKind::Header, "X-Tenant").validation("^[a-z-]+$"))
            .build();

        let catalog = FieldCatalog::new(vec![field]).unwrap();
        let regex = catalog.validator("tenant").unwrap();
        assert!(regex.is_match("acme-corp"));
        assert!(!regex.is_match("ACME"));
    }

    #[test]
    fn test_needs_response_buffering() {
        let header_only = FieldDefinition::builder("rate_limit")
            .downstream_response(DownstreamResponseExtraction::new(
                SourceKind::Header,
                "X-RateLimit-Remaining",
            ))
            .build();
        let catalog = FieldCatalog::new(vec![header_only]).unwrap();
        assert!(!catalog.needs_response_buffering());

        let body_field = FieldDefinition::builder("user_ref")
            .downstream_response(DownstreamResponseExtraction::new(
                SourceKind::Body,
                "$.user.id",
            ))
            .build();
        let catalog = FieldCatalog::new(vec![body_field]).unwrap();
        assert!(catalog.needs_response_buffering());
    }

    #[test]
    fn test_target_system_filtering() {
        let all = DownstreamRequestEnrichment::new(SourceKind::Header, "X-Tenant");
        assert!(all.applies_to("svc-a"));
        assert!(all.applies_to("svc-b"));

        let scoped =
            DownstreamRequestEnrichment::new(SourceKind::Header, "X-Tenant").targets(["svc-a"]);
        assert!(scoped.applies_to("svc-a"));
        assert!(!scoped.applies_to("svc-b"));
    }

    #[test]
    fn test_catalog_lookup_and_indexes() {
        let fields = vec![
            FieldDefinition::builder("request_id")
                .inbound(InboundSource::new(SourceKind::Header, "X-Request-ID"))
                .response(ResponseEnrichment::new(SourceKind::Header, "X-Request-ID"))
                .build(),
            FieldDefinition::builder("tenant")
                .inbound(InboundSource::new(SourceKind::Query, "tenant"))
                .downstream_request(DownstreamRequestEnrichment::new(SourceKind::Query, "tenant"))
                .build(),
        ];

        let catalog = FieldCatalog::new(fields).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.field("request_id").is_some());
        assert!(catalog.field("missing").is_none());
        assert_eq!(catalog.inbound_fields().count(), 2);
        assert_eq!(catalog.response_fields().count(), 1);
        assert_eq!(catalog.downstream_request_fields().count(), 1);
        assert_eq!(catalog.downstream_response_fields().count(), 0);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Header.to_string(), "header");
        assert_eq!(SourceKind::Cookie.to_string(), "cookie");
        assert_eq!(SourceKind::Query.to_string(), "query");
        assert_eq!(SourceKind::Claim.to_string(), "claim");
        assert_eq!(SourceKind::Path.to_string(), "path");
        assert_eq!(SourceKind::Body.to_string(), "body");
    }
}
