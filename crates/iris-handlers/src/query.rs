//! Query-parameter source handler.
//!
//! Query parameters can be read from the inbound request and forwarded
//! onto downstream requests. They have no response or body analogue.

use crate::handler::{Applied, Handled, SourceHandler};
use crate::view::{DownstreamRequest, RequestView};
use iris_core::SourceKind;

/// Handler for [`SourceKind::Query`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryHandler;

impl SourceHandler for QueryHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Query
    }

    fn extract_inbound(&self, request: &RequestView, selector: &str) -> Handled {
        Handled::from_option(request.query_param(selector).map(ToString::to_string))
    }

    fn enrich_downstream(
        &self,
        request: &mut DownstreamRequest,
        key: &str,
        value: &str,
    ) -> Applied {
        request.add_query_param(key, value);
        Applied::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ResponseView;
    use http::Uri;

    #[test]
    fn test_extract_inbound() {
        let view = RequestView::builder()
            .uri(Uri::from_static("/orders?tenant=acme&channel=web"))
            .build();

        let handler = QueryHandler;
        assert_eq!(
            handler.extract_inbound(&view, "tenant"),
            Handled::Value("acme".to_string())
        );
        assert_eq!(handler.extract_inbound(&view, "missing"), Handled::Absent);
    }

    #[test]
    fn test_enrich_downstream() {
        let mut request = DownstreamRequest::new();
        QueryHandler.enrich_downstream(&mut request, "tenant", "acme");

        assert_eq!(request.query_params(), &[("tenant".to_string(), "acme".to_string())]);
    }

    #[test]
    fn test_response_enrichment_unsupported() {
        let mut response = ResponseView::new();
        assert!(QueryHandler
            .enrich_response(&mut response, "tenant", "acme")
            .is_unsupported());
    }
}
