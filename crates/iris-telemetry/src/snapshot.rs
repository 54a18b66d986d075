//! Observability snapshots of a request context.
//!
//! Sinks never read the [`Context`] directly: they receive flat
//! key/value snapshots produced here. Sensitive fields appear in their
//! masked rendition only ([`Context::get_masked_or_raw`]); the raw value
//! of a sensitive field never reaches a sink.

use iris_core::{CardinalityTier, Context, FieldCatalog};

/// Produces the `{log key -> masked-or-raw value}` snapshot for
/// structured-log sinks.
///
/// Only fields with a configured log key appear, and only once they are
/// resolved. Pairs come out in catalog declaration order.
///
/// # Example
///
/// ```rust
/// use iris_core::{
///     Context, FieldCatalog, FieldDefinition, InboundSource, ObservabilitySpec, SourceKind,
/// };
/// use iris_telemetry::snapshot::log_fields;
///
/// let catalog = FieldCatalog::new(vec![FieldDefinition::builder("request_id")
///     .inbound(InboundSource::new(SourceKind::Header, "X-Request-ID"))
///     .observability(ObservabilitySpec {
///         log_key: Some("request_id".to_string()),
///         ..ObservabilitySpec::default()
///     })
///     .build()])
/// .unwrap();
///
/// let ctx = Context::new();
/// ctx.insert("request_id", "abc-123");
///
/// assert_eq!(
///     log_fields(&ctx, &catalog),
///     vec![("request_id".to_string(), "abc-123".to_string())]
/// );
/// ```
#[must_use]
pub fn log_fields(ctx: &Context, catalog: &FieldCatalog) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for field in catalog.fields() {
        let Some(log_key) = &field.observability().log_key else {
            continue;
        };
        if let Some(value) = ctx.get_masked_or_raw(field.name()) {
            pairs.push((log_key.clone(), value));
        }
    }
    pairs
}

/// Produces the `{metric tag -> value}` snapshot for a metrics sink.
///
/// A field is included iff it has a metric spec and its declared
/// cardinality does not exceed `max_cardinality` — a backend that cannot
/// absorb unbounded tag values asks for `Low` or `Medium` and never sees
/// the high-cardinality tags.
#[must_use]
pub fn metric_tags(
    ctx: &Context,
    catalog: &FieldCatalog,
    max_cardinality: CardinalityTier,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for field in catalog.fields() {
        let Some(metric) = &field.observability().metric else {
            continue;
        };
        if metric.cardinality > max_cardinality {
            continue;
        }
        if let Some(value) = ctx.get_masked_or_raw(field.name()) {
            pairs.push((metric.tag.clone(), value));
        }
    }
    pairs
}

/// Produces the `{span tag -> value}` snapshot for a tracing sink.
#[must_use]
pub fn span_tags(ctx: &Context, catalog: &FieldCatalog) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for field in catalog.fields() {
        let Some(span_key) = &field.observability().span_key else {
            continue;
        };
        if let Some(value) = ctx.get_masked_or_raw(field.name()) {
            pairs.push((span_key.clone(), value));
        }
    }
    pairs
}
