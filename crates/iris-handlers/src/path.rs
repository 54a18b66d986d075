//! Path-variable source handler.
//!
//! Path variables are resolved by the host's router; they become
//! available in the post-auth extraction phase and have no outbound
//! analogue.

use crate::handler::{Handled, SourceHandler};
use crate::view::RequestView;
use iris_core::SourceKind;

/// Handler for [`SourceKind::Path`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathHandler;

impl SourceHandler for PathHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Path
    }

    fn extract_inbound(&self, request: &RequestView, selector: &str) -> Handled {
        Handled::from_option(request.path_param(selector).map(ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_inbound() {
        let view = RequestView::builder().path_param("order_id", "42").build();

        let handler = PathHandler;
        assert_eq!(
            handler.extract_inbound(&view, "order_id"),
            Handled::Value("42".to_string())
        );
        assert_eq!(handler.extract_inbound(&view, "missing"), Handled::Absent);
    }

    #[test]
    fn test_absent_before_routing() {
        let view = RequestView::builder().build();
        assert_eq!(PathHandler.extract_inbound(&view, "order_id"), Handled::Absent);
    }
}
