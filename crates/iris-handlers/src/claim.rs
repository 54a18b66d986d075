//! Claim source handler.
//!
//! Claims are read from the authenticated principal the host resolved,
//! never from the wire, and never re-serialized outward. They are only
//! available once authentication has run (the post-auth extraction
//! phase).

use crate::handler::{Handled, SourceHandler};
use crate::view::RequestView;
use iris_core::SourceKind;

/// Handler for [`SourceKind::Claim`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimHandler;

impl SourceHandler for ClaimHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Claim
    }

    fn extract_inbound(&self, request: &RequestView, selector: &str) -> Handled {
        Handled::from_option(request.claim(selector).map(ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DownstreamRequest, ResponseView};

    #[test]
    fn test_extract_inbound() {
        let view = RequestView::builder()
            .claim("sub", "user-7")
            .claim("tenant_id", "acme")
            .build();

        let handler = ClaimHandler;
        assert_eq!(
            handler.extract_inbound(&view, "sub"),
            Handled::Value("user-7".to_string())
        );
        assert_eq!(handler.extract_inbound(&view, "missing"), Handled::Absent);
    }

    #[test]
    fn test_absent_before_authentication() {
        let view = RequestView::builder().build();
        assert_eq!(ClaimHandler.extract_inbound(&view, "sub"), Handled::Absent);
    }

    #[test]
    fn test_outbound_operations_unsupported() {
        let mut response = ResponseView::new();
        assert!(ClaimHandler
            .enrich_response(&mut response, "sub", "user-7")
            .is_unsupported());

        let mut request = DownstreamRequest::new();
        assert!(ClaimHandler
            .enrich_downstream(&mut request, "sub", "user-7")
            .is_unsupported());
    }
}
