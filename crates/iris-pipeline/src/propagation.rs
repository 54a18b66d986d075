//! Outbound enrichment and downstream capture.
//!
//! Three operations cover the remaining data-flow legs:
//!
//! - per-downstream-call request enrichment, filtered by target system
//!   id — runs once per outgoing call, never once per context, because
//!   one request can feed many calls with different filtered subsets;
//! - capture of values from a downstream response back into the *same*
//!   [`Context`] that produced the outbound call, so later code and the
//!   final response enrichment see downstream-derived values;
//! - outbound response enrichment (headers and cookies only).
//!
//! Enrichment reads the context and never mutates it, so sibling
//! downstream calls may enrich concurrently without locking. Capture
//! mutates the shared context through independent key insertions, which
//! the context's map supports concurrently.

use crate::buffer::{BufferedResponse, CapturedResponse};
use crate::extraction::store_field;
use iris_core::{Context, FieldCatalog, PropagationEntry};
use iris_handlers::{DownstreamRequest, DownstreamResponse, HandlerRegistry, ResponseView};
use std::sync::Arc;

/// Orchestrates the outbound and downstream legs of propagation.
///
/// # Example
///
/// ```rust
/// use iris_core::{
///     Context, DownstreamRequestEnrichment, FieldCatalog, FieldDefinition, SourceKind,
/// };
/// use iris_handlers::{DownstreamRequest, HandlerRegistry};
/// use iris_pipeline::PropagationPipeline;
/// use std::sync::Arc;
///
/// let catalog = FieldCatalog::new(vec![FieldDefinition::builder("tenant")
///     .downstream_request(
///         DownstreamRequestEnrichment::new(SourceKind::Header, "X-Tenant")
///             .targets(["svc-a"]),
///     )
///     .build()])
/// .unwrap();
///
/// let pipeline =
///     PropagationPipeline::new(Arc::new(catalog), Arc::new(HandlerRegistry::with_defaults()));
///
/// let ctx = Context::new();
/// ctx.insert("tenant", "acme");
///
/// let mut call = DownstreamRequest::new();
/// pipeline.enrich_downstream(&ctx, "svc-a", &mut call);
/// assert_eq!(call.header("x-tenant"), Some("acme"));
///
/// let mut other = DownstreamRequest::new();
/// pipeline.enrich_downstream(&ctx, "svc-b", &mut other);
/// assert_eq!(other.header("x-tenant"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PropagationPipeline {
    catalog: Arc<FieldCatalog>,
    registry: Arc<HandlerRegistry>,
}

impl PropagationPipeline {
    /// Creates a pipeline over the given catalog and registry.
    #[must_use]
    pub fn new(catalog: Arc<FieldCatalog>, registry: Arc<HandlerRegistry>) -> Self {
        Self { catalog, registry }
    }

    /// Whether downstream responses will be buffered during capture.
    #[must_use]
    pub fn buffers_responses(&self) -> bool {
        self.catalog.needs_response_buffering()
    }

    /// Computes the entries bound for one downstream call.
    ///
    /// A field is included iff its target set is empty (all systems) or
    /// contains `target_system`, and it has a resolved value in the
    /// context.
    #[must_use]
    pub fn propagation_entries(
        &self,
        ctx: &Context,
        target_system: &str,
    ) -> Vec<PropagationEntry> {
        let mut entries = Vec::new();
        for field in self.catalog.downstream_request_fields() {
            let Some(enrichment) = field.downstream_request() else {
                continue;
            };
            if !enrichment.applies_to(target_system) {
                continue;
            }
            let Some(value) = ctx.get(field.name()) else {
                tracing::debug!(
                    field = field.name(),
                    target_system,
                    "field unresolved; skipping propagation"
                );
                continue;
            };
            entries.push(PropagationEntry {
                kind: enrichment.kind,
                key: enrichment.key.clone(),
                value,
                sensitive: field.is_sensitive(),
            });
        }
        entries
    }

    /// Enriches one outgoing downstream request.
    ///
    /// Returns the number of entries applied.
    pub fn enrich_downstream(
        &self,
        ctx: &Context,
        target_system: &str,
        request: &mut DownstreamRequest,
    ) -> usize {
        let entries = self.propagation_entries(ctx, target_system);
        let mut applied = 0;
        for entry in &entries {
            if !self
                .registry
                .enrich_downstream(entry.kind, request, &entry.key, &entry.value)
                .is_unsupported()
            {
                applied += 1;
            }
        }
        metrics::counter!("iris_downstream_enrichments_total", "target" => target_system.to_string())
            .increment(applied as u64);
        applied
    }

    /// Captures configured fields from a downstream response into the
    /// context.
    ///
    /// The response is buffered first iff any field reads a downstream
    /// body, and is returned to the caller either way so application
    /// code can keep reading it. Capture failures (missing values,
    /// non-JSON bodies) are never faults of the request: absent values
    /// fall back to the configured default, or a warning when the
    /// extraction is marked required.
    pub fn capture(&self, ctx: &Context, response: DownstreamResponse) -> CapturedResponse {
        let handle = if self.buffers_responses() {
            CapturedResponse::Buffered(BufferedResponse::buffer(response))
        } else {
            CapturedResponse::Raw(response)
        };

        for field in self.catalog.downstream_response_fields() {
            let Some(extraction) = field.downstream_response() else {
                continue;
            };

            let value = self
                .registry
                .extract_downstream(extraction.kind, &handle, &extraction.selector)
                .into_option()
                .or_else(|| extraction.default_value.clone());

            match value {
                Some(value) => {
                    store_field(ctx, field, value);
                    metrics::counter!("iris_downstream_captures_total").increment(1);
                }
                None if extraction.required => {
                    tracing::warn!(
                        field = field.name(),
                        selector = extraction.selector.as_str(),
                        "required downstream value absent"
                    );
                }
                None => {
                    tracing::debug!(
                        field = field.name(),
                        selector = extraction.selector.as_str(),
                        "downstream value absent"
                    );
                }
            }
        }

        handle
    }

    /// Enriches the outbound response with configured fields.
    ///
    /// Returns the number of entries applied.
    pub fn enrich_response(&self, ctx: &Context, response: &mut ResponseView) -> usize {
        let mut applied = 0;
        for field in self.catalog.response_fields() {
            let Some(enrichment) = field.response() else {
                continue;
            };
            let Some(value) = ctx.get(field.name()) else {
                tracing::debug!(
                    field = field.name(),
                    "field unresolved; skipping response enrichment"
                );
                continue;
            };
            if !self
                .registry
                .enrich_response(enrichment.kind, response, &enrichment.key, &value)
                .is_unsupported()
            {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, StatusCode};
    use iris_handlers::DownstreamResponseHandle;
    use iris_core::{
        DownstreamRequestEnrichment, DownstreamResponseExtraction, FieldDefinition, MaskPattern,
        ResponseEnrichment, SourceKind,
    };

    fn pipeline(fields: Vec<FieldDefinition>) -> PropagationPipeline {
        PropagationPipeline::new(
            Arc::new(FieldCatalog::new(fields).unwrap()),
            Arc::new(HandlerRegistry::with_defaults()),
        )
    }

    #[test]
    fn test_target_system_filtering() {
        let fields = vec![
            FieldDefinition::builder("scoped")
                .downstream_request(
                    DownstreamRequestEnrichment::new(SourceKind::Header, "X-Scoped")
                        .targets(["svc-a"]),
                )
                .build(),
            FieldDefinition::builder("global")
                .downstream_request(DownstreamRequestEnrichment::new(
                    SourceKind::Header,
                    "X-Global",
                ))
                .build(),
        ];
        let pipeline = pipeline(fields);
        let ctx = Context::new();
        ctx.insert("scoped", "s");
        ctx.insert("global", "g");

        let for_a = pipeline.propagation_entries(&ctx, "svc-a");
        assert_eq!(for_a.len(), 2);

        let for_b = pipeline.propagation_entries(&ctx, "svc-b");
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].key, "X-Global");
    }

    #[test]
    fn test_enrich_downstream_headers_and_query() {
        let fields = vec![
            FieldDefinition::builder("tenant")
                .downstream_request(DownstreamRequestEnrichment::new(
                    SourceKind::Header,
                    "X-Tenant",
                ))
                .build(),
            FieldDefinition::builder("channel")
                .downstream_request(DownstreamRequestEnrichment::new(SourceKind::Query, "channel"))
                .build(),
        ];
        let pipeline = pipeline(fields);
        let ctx = Context::new();
        ctx.insert("tenant", "acme");
        ctx.insert("channel", "web");

        let mut request = DownstreamRequest::new();
        let applied = pipeline.enrich_downstream(&ctx, "svc-a", &mut request);

        assert_eq!(applied, 2);
        assert_eq!(request.header("x-tenant"), Some("acme"));
        assert_eq!(request.query_string(), "channel=web");
    }

    #[test]
    fn test_unresolved_fields_are_skipped() {
        let fields = vec![FieldDefinition::builder("tenant")
            .downstream_request(DownstreamRequestEnrichment::new(
                SourceKind::Header,
                "X-Tenant",
            ))
            .build()];
        let pipeline = pipeline(fields);
        let ctx = Context::new();

        let mut request = DownstreamRequest::new();
        assert_eq!(pipeline.enrich_downstream(&ctx, "svc-a", &mut request), 0);
        assert_eq!(request.header("x-tenant"), None);
    }

    #[test]
    fn test_capture_header_without_buffering() {
        let fields = vec![FieldDefinition::builder("remaining")
            .downstream_response(DownstreamResponseExtraction::new(
                SourceKind::Header,
                "X-RateLimit-Remaining",
            ))
            .build()];
        let pipeline = pipeline(fields);
        assert!(!pipeline.buffers_responses());

        let ctx = Context::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", "17".parse().unwrap());
        let handle = pipeline.capture(&ctx, DownstreamResponse::new(StatusCode::OK, headers, "{}"));

        assert_eq!(ctx.get("remaining").as_deref(), Some("17"));
        // Header-only capture never touched the stream.
        assert!(matches!(handle, CapturedResponse::Raw(_)));
        assert_eq!(handle.body_text().as_deref(), Some("{}"));
    }

    #[test]
    fn test_capture_body_buffers_for_reuse() {
        let fields = vec![FieldDefinition::builder("user_ref")
            .downstream_response(DownstreamResponseExtraction::new(
                SourceKind::Body,
                "$.user.id",
            ))
            .build()];
        let pipeline = pipeline(fields);
        assert!(pipeline.buffers_responses());

        let ctx = Context::new();
        let response = DownstreamResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"user":{"id":"42"}}"#,
        );
        let handle = pipeline.capture(&ctx, response);

        assert_eq!(ctx.get("user_ref").as_deref(), Some("42"));
        // The caller can still read the full body, repeatedly.
        assert_eq!(handle.body_text().as_deref(), Some(r#"{"user":{"id":"42"}}"#));
        assert_eq!(handle.body_text().as_deref(), Some(r#"{"user":{"id":"42"}}"#));
    }

    #[test]
    fn test_capture_missing_path_uses_default() {
        let fields = vec![FieldDefinition::builder("user_ref")
            .downstream_response(
                DownstreamResponseExtraction::new(SourceKind::Body, "$.user.missing")
                    .default_value("unknown"),
            )
            .build()];
        let pipeline = pipeline(fields);

        let ctx = Context::new();
        pipeline.capture(
            &ctx,
            DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), r#"{"user":{"id":"42"}}"#),
        );
        assert_eq!(ctx.get("user_ref").as_deref(), Some("unknown"));
    }

    #[test]
    fn test_capture_required_absence_warns_not_fails() {
        let fields = vec![FieldDefinition::builder("user_ref")
            .downstream_response(
                DownstreamResponseExtraction::new(SourceKind::Body, "$.user.id").required(),
            )
            .build()];
        let pipeline = pipeline(fields);

        let ctx = Context::new();
        // Malformed JSON: recovered locally, never a request fault.
        pipeline.capture(
            &ctx,
            DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), "not json"),
        );
        assert_eq!(ctx.get("user_ref"), None);
    }

    #[test]
    fn test_capture_masks_sensitive_values() {
        let fields = vec![FieldDefinition::builder("account")
            .downstream_response(DownstreamResponseExtraction::new(
                SourceKind::Body,
                "$.account",
            ))
            .sensitive(Some("last:4".parse::<MaskPattern>().unwrap()))
            .build()];
        let pipeline = pipeline(fields);

        let ctx = Context::new();
        pipeline.capture(
            &ctx,
            DownstreamResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                r#"{"account":"12345678"}"#,
            ),
        );
        assert_eq!(ctx.get("account").as_deref(), Some("12345678"));
        assert_eq!(ctx.get_masked_or_raw("account").as_deref(), Some("****5678"));
    }

    #[test]
    fn test_enrich_response_header_and_cookie() {
        let fields = vec![
            FieldDefinition::builder("request_id")
                .response(ResponseEnrichment::new(SourceKind::Header, "X-Request-ID"))
                .build(),
            FieldDefinition::builder("session")
                .response(ResponseEnrichment::new(SourceKind::Cookie, "session"))
                .build(),
        ];
        let pipeline = pipeline(fields);
        let ctx = Context::new();
        ctx.insert("request_id", "abc-123");
        ctx.insert("session", "s1");

        let mut response = ResponseView::new();
        let applied = pipeline.enrich_response(&ctx, &mut response);

        assert_eq!(applied, 2);
        assert_eq!(response.header("x-request-id"), Some("abc-123"));
        assert_eq!(response.cookies()[0].name(), "session");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_sibling_captures() {
        let fields = vec![
            FieldDefinition::builder("a_ref")
                .downstream_response(DownstreamResponseExtraction::new(SourceKind::Body, "$.a"))
                .build(),
            FieldDefinition::builder("b_ref")
                .downstream_response(DownstreamResponseExtraction::new(SourceKind::Body, "$.b"))
                .build(),
        ];
        let pipeline = Arc::new(pipeline(fields));
        let ctx = Context::new();

        let first = tokio::spawn({
            let pipeline = pipeline.clone();
            let ctx = ctx.clone();
            async move {
                pipeline.capture(
                    &ctx,
                    DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), r#"{"a":"1"}"#),
                );
            }
        });
        let second = tokio::spawn({
            let pipeline = pipeline.clone();
            let ctx = ctx.clone();
            async move {
                pipeline.capture(
                    &ctx,
                    DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), r#"{"b":"2"}"#),
                );
            }
        });

        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(ctx.get("a_ref").as_deref(), Some("1"));
        assert_eq!(ctx.get("b_ref").as_deref(), Some("2"));
    }
}
