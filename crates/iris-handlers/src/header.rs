//! Header source handler.
//!
//! Headers are the most capable source kind: they can be read from the
//! inbound request, echoed on the outbound response, forwarded to
//! downstream requests, and read back from downstream responses. The only
//! operation they do not serve is inbound-body extraction.

use crate::handler::{Applied, Handled, SourceHandler};
use crate::view::{DownstreamRequest, DownstreamResponseHandle, RequestView, ResponseView};
use iris_core::SourceKind;

/// Handler for [`SourceKind::Header`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderHandler;

impl SourceHandler for HeaderHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Header
    }

    fn extract_inbound(&self, request: &RequestView, selector: &str) -> Handled {
        Handled::from_option(request.header(selector).map(ToString::to_string))
    }

    fn enrich_response(&self, response: &mut ResponseView, key: &str, value: &str) -> Applied {
        response.set_header(key, value);
        Applied::Applied
    }

    fn enrich_downstream(
        &self,
        request: &mut DownstreamRequest,
        key: &str,
        value: &str,
    ) -> Applied {
        request.set_header(key, value);
        Applied::Applied
    }

    fn extract_downstream(
        &self,
        response: &dyn DownstreamResponseHandle,
        selector: &str,
    ) -> Handled {
        Handled::from_option(response.header(selector))
    }
}
