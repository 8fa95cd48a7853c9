//! Redaction helpers for error text that leaves the process.
//!
//! Tool errors are returned to the calling client verbatim, so anything derived from a URL or a
//! remote body goes through here first.

use url::Url;

/// Upper bound on how much of a remote error body is echoed back in an error message.
pub const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Drop credentials, query and fragment from a URL.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

/// Cut `text` to at most [`MAX_ERROR_BODY_CHARS`] characters, marking the cut.
#[must_use]
pub fn truncate_error_body(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_url_drops_userinfo_and_query() {
        let url = Url::parse("https://user:pw@restcsv.com/api/csvs/1/search?term=secret#frag")
            .expect("url");
        assert_eq!(redact_url(&url), "https://restcsv.com/api/csvs/1/search");
    }

    #[test]
    fn truncate_error_body_keeps_short_bodies() {
        assert_eq!(truncate_error_body("not found"), "not found");
    }

    #[test]
    fn truncate_error_body_cuts_on_char_boundary() {
        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 10);
        let out = truncate_error_body(&long);
        assert!(out.ends_with("... (truncated)"));
        assert_eq!(
            out.trim_end_matches("... (truncated)").chars().count(),
            MAX_ERROR_BODY_CHARS
        );
    }
}
