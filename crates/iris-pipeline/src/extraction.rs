//! The phased inbound extraction pipeline.
//!
//! Extraction runs in three phases because each depends on state the
//! host produces between them:
//!
//! 1. `PreAuth` — headers, query parameters, and cookies, captured
//!    before authentication so failure telemetry still carries
//!    request/tenant identity.
//! 2. `PostAuth` — path variables (routing has run) and principal
//!    claims (authentication has run).
//! 3. `BodyProcessing` — JSON-path selections from the parsed request
//!    body, if the host parsed one.
//!
//! Phases run strictly forward. Re-running a phase is permitted and
//! idempotent: fields already resolved in the
//! [`Context`](iris_core::Context) are skipped, which also keeps
//! generated values stable across re-entry.

use iris_core::{
    Context, ExtractionError, FallbackSource, FieldCatalog, FieldDefinition, InboundSource, Phase,
    SourceKind, FULL_MASK,
};
use iris_handlers::{HandlerRegistry, RequestView};
use std::sync::Arc;

/// What the host can offer a phase to read from.
enum PhaseInput<'a> {
    /// The inbound request view (pre-auth and post-auth phases).
    Request(&'a RequestView),
    /// The parsed JSON body (body-processing phase).
    Body(&'a serde_json::Value),
}

/// Orchestrates when each configured field is read.
///
/// Process-wide and stateless: all per-request state lives in the
/// [`Context`]. Clone-cheap via shared catalog and registry.
///
/// # Example
///
/// ```rust
/// use iris_core::{Context, FieldCatalog, FieldDefinition, InboundSource, SourceKind};
/// use iris_handlers::{HandlerRegistry, RequestView};
/// use iris_pipeline::ExtractionPipeline;
/// use std::sync::Arc;
///
/// let catalog = FieldCatalog::new(vec![FieldDefinition::builder("tenant")
///     .inbound(InboundSource::new(SourceKind::Header, "X-Tenant"))
///     .build()])
/// .unwrap();
///
/// let pipeline = ExtractionPipeline::new(
///     Arc::new(catalog),
///     Arc::new(HandlerRegistry::with_defaults()),
/// );
///
/// let request = RequestView::builder().header("x-tenant", "acme").build();
/// let ctx = Context::new();
/// pipeline.run_pre_auth(&ctx, &request).unwrap();
///
/// assert_eq!(ctx.get("tenant").as_deref(), Some("acme"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    catalog: Arc<FieldCatalog>,
    registry: Arc<HandlerRegistry>,
}

impl ExtractionPipeline {
    /// Creates a pipeline over the given catalog and registry.
    #[must_use]
    pub fn new(catalog: Arc<FieldCatalog>, registry: Arc<HandlerRegistry>) -> Self {
        Self { catalog, registry }
    }

    /// Returns the catalog this pipeline serves.
    #[must_use]
    pub fn catalog(&self) -> &Arc<FieldCatalog> {
        &self.catalog
    }

    /// Runs the pre-authentication phase: Header, Query, and Cookie
    /// fields.
    pub fn run_pre_auth(
        &self,
        ctx: &Context,
        request: &RequestView,
    ) -> Result<(), ExtractionError> {
        self.run_phase(ctx, Phase::PreAuth, &PhaseInput::Request(request))
    }

    /// Runs the post-authentication phase: Path and Claim fields.
    ///
    /// The host calls this once routing has resolved path variables and
    /// authentication (if any) has populated claims on the view.
    pub fn run_post_auth(
        &self,
        ctx: &Context,
        request: &RequestView,
    ) -> Result<(), ExtractionError> {
        self.run_phase(ctx, Phase::PostAuth, &PhaseInput::Request(request))
    }

    /// Runs the body-processing phase: Body fields against the parsed
    /// JSON document.
    pub fn run_body(
        &self,
        ctx: &Context,
        body: &serde_json::Value,
    ) -> Result<(), ExtractionError> {
        self.run_phase(ctx, Phase::BodyProcessing, &PhaseInput::Body(body))
    }

    /// Marks extraction complete for this request.
    pub fn finish(&self, ctx: &Context) {
        ctx.complete();
    }

    fn run_phase(
        &self,
        ctx: &Context,
        phase: Phase,
        input: &PhaseInput<'_>,
    ) -> Result<(), ExtractionError> {
        ctx.enter_phase(phase)?;

        for field in self.catalog.inbound_fields() {
            let inbound = field
                .inbound()
                .filter(|inbound| phase.eligible_kinds().contains(&inbound.kind()));
            let Some(inbound) = inbound else { continue };

            // Already resolved (e.g. a phase re-run): keep the value.
            if ctx.contains(field.name()) {
                continue;
            }

            self.resolve_field(ctx, phase, field, inbound, input)?;
        }

        Ok(())
    }

    /// Resolves one field: primary source, then the fallback chain, then
    /// the static default, then generation, then absent. A value found
    /// anywhere along the way gets the field's transform and validation
    /// applied before it is stored.
    fn resolve_field(
        &self,
        ctx: &Context,
        phase: Phase,
        field: &FieldDefinition,
        inbound: &InboundSource,
        input: &PhaseInput<'_>,
    ) -> Result<(), ExtractionError> {
        let mut value = self.lookup(inbound.kind(), inbound.selector(), input);

        let mut link = inbound.fallback_chain();
        while value.is_none() {
            let Some(fallback) = link else { break };
            value = self.lookup(fallback.kind, &fallback.selector, input);
            link = next_link(fallback);
        }

        if value.is_none() {
            // A default suppresses the required-field failure; generation
            // only applies when no default is configured.
            if let Some(default) = inbound.default() {
                value = Some(default.to_string());
            } else if let Some(generator) = inbound.generator() {
                value = Some(generator.generate());
            }
        }

        let Some(mut value) = value else {
            if inbound.is_required() {
                metrics::counter!("iris_field_extraction_failures_total", "phase" => phase.name())
                    .increment(1);
                return Err(ExtractionError::missing_required(
                    field.name(),
                    inbound.kind(),
                ));
            }
            tracing::debug!(field = field.name(), %phase, "field absent from every source");
            return Ok(());
        };

        if let Some(transform) = inbound.value_transform() {
            value = transform.apply(&value);
        }

        if let Some(validator) = self.catalog.validator(field.name()) {
            if !validator.is_match(&value) {
                if inbound.is_required() {
                    metrics::counter!("iris_field_extraction_failures_total", "phase" => phase.name())
                        .increment(1);
                    return Err(ExtractionError::validation_failed(
                        field.name(),
                        inbound.kind(),
                        validator.as_str(),
                    ));
                }
                tracing::debug!(
                    field = field.name(),
                    pattern = validator.as_str(),
                    "value failed validation; dropping"
                );
                return Ok(());
            }
        }

        store_field(ctx, field, value);
        metrics::counter!("iris_fields_extracted_total", "phase" => phase.name()).increment(1);
        Ok(())
    }

    fn lookup(&self, kind: SourceKind, selector: &str, input: &PhaseInput<'_>) -> Option<String> {
        match (kind, input) {
            (SourceKind::Body, PhaseInput::Body(document)) => self
                .registry
                .extract_inbound_body(kind, document, selector)
                .into_option(),
            (SourceKind::Body, PhaseInput::Request(_)) => {
                tracing::debug!(selector, "body source not available in this phase");
                None
            }
            (_, PhaseInput::Request(request)) => self
                .registry
                .extract_inbound(kind, request, selector)
                .into_option(),
            (_, PhaseInput::Body(_)) => {
                tracing::debug!(%kind, selector, "request source not available in body phase");
                None
            }
        }
    }
}

fn next_link(fallback: &FallbackSource) -> Option<&FallbackSource> {
    fallback.fallback.as_deref()
}

/// Stores a resolved value, masking it first when the field is
/// sensitive. A sensitive field without a usable mask pattern is
/// withheld behind the full-mask token rather than exposed.
pub(crate) fn store_field(ctx: &Context, field: &FieldDefinition, value: String) {
    if field.is_sensitive() {
        let masked = field
            .mask()
            .map_or_else(|| FULL_MASK.to_string(), |mask| mask.apply(&value));
        ctx.insert_masked(field.name(), masked);
    }
    ctx.insert(field.name(), value);
}
