//! HTTP method semantics mapped onto MCP `ToolAnnotations`.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Annotations for a tool backed by one request with `method`.
///
/// `openWorldHint` is always `true`: every tool talks to a remote service. Unknown methods get
/// only that hint. The title is left unset for the caller to fill in.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    // (read_only, destructive, idempotent)
    let hints = if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        Some((true, false, Some(true)))
    } else if method == Method::POST {
        Some((false, false, Some(false)))
    } else if method == Method::PUT || method == Method::DELETE {
        Some((false, true, Some(true)))
    } else if method == Method::PATCH {
        // PATCH may or may not be idempotent.
        Some((false, true, None))
    } else {
        None
    };

    ToolAnnotations {
        title: None,
        read_only_hint: hints.map(|h| h.0),
        destructive_hint: hints.map(|h| h.1),
        idempotent_hint: hints.and_then(|h| h.2),
        open_world_hint: Some(true),
    }
}
