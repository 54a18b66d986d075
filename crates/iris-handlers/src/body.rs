//! Body source handler.
//!
//! Bodies are extract-only in both directions: injecting computed fields
//! into an arbitrary request or response body is unsafe without a body
//! schema. Inbound extraction runs against the document the host already
//! parsed (the body-processing phase); downstream extraction parses the
//! response's body text on demand. Non-JSON or empty bodies yield absent
//! for any selector, never an error.

use crate::handler::{Handled, SourceHandler};
use crate::selector::select_text;
use crate::view::DownstreamResponseHandle;
use iris_core::SourceKind;

/// Handler for [`SourceKind::Body`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyHandler;

impl SourceHandler for BodyHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Body
    }

    fn extract_inbound_body(&self, body: &serde_json::Value, selector: &str) -> Handled {
        Handled::from_option(select_text(body, selector))
    }

    fn extract_downstream(
        &self,
        response: &dyn DownstreamResponseHandle,
        selector: &str,
    ) -> Handled {
        let Some(text) = response.body_text() else {
            return Handled::Absent;
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(document) => Handled::from_option(select_text(&document, selector)),
            Err(error) => {
                tracing::debug!(%error, "downstream body is not JSON; body selectors yield absent");
                Handled::Absent
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DownstreamResponse, RequestView};
    use http::{HeaderMap, StatusCode};
    use serde_json::json;

    #[test]
    fn test_extract_inbound_body() {
        let body = json!({"order": {"id": "o-42", "total": 99}});

        let handler = BodyHandler;
        assert_eq!(
            handler.extract_inbound_body(&body, "$.order.id"),
            Handled::Value("o-42".to_string())
        );
        assert_eq!(
            handler.extract_inbound_body(&body, "$.order.total"),
            Handled::Value("99".to_string())
        );
        assert_eq!(handler.extract_inbound_body(&body, "$.order.missing"), Handled::Absent);
    }

    #[test]
    fn test_extract_downstream() {
        let response = DownstreamResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"user":{"id":"42"}}"#,
        );

        assert_eq!(
            BodyHandler.extract_downstream(&response, "$.user.id"),
            Handled::Value("42".to_string())
        );
    }

    #[test]
    fn test_extract_downstream_missing_path_is_absent() {
        let response = DownstreamResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"user":{"id":"42"}}"#,
        );

        assert_eq!(
            BodyHandler.extract_downstream(&response, "$.user.missing"),
            Handled::Absent
        );
    }

    #[test]
    fn test_extract_downstream_non_json_is_absent() {
        let response =
            DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), "<html>oops</html>");
        assert_eq!(BodyHandler.extract_downstream(&response, "$.a"), Handled::Absent);
    }

    #[test]
    fn test_extract_downstream_empty_body_is_absent() {
        let response = DownstreamResponse::empty(StatusCode::NO_CONTENT, HeaderMap::new());
        assert_eq!(BodyHandler.extract_downstream(&response, "$.a"), Handled::Absent);
    }

    #[test]
    fn test_inbound_request_extraction_unsupported() {
        let view = RequestView::builder().build();
        assert!(BodyHandler.extract_inbound(&view, "$.a").is_unsupported());
    }
}
