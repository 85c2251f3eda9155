//! API endpoint handling.
//!
//! Users paste all kinds of addresses: a bare host, the `/v1` root, or a full
//! route such as `/v1/chat/completions`. Everything is reduced to the `/v1`
//! root before the models route is appended.

/// Offered as the default when no configuration exists yet.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const VERSION_SEGMENT: &str = "/v1";

/// Canonicalizes `base_url` so that it ends in exactly one `/v1`.
///
/// No syntax validation happens here; a malformed address stays malformed
/// and surfaces later as a request failure.
pub fn normalize_base_url(base_url: &str) -> String {
    let mut normalized = base_url.trim_end_matches('/');

    if let Some((prefix, _)) = normalized.split_once("/v1/") {
        normalized = prefix;
    } else if let Some(prefix) = normalized.strip_suffix(VERSION_SEGMENT) {
        normalized = prefix;
    }

    format!("{normalized}{VERSION_SEGMENT}")
}

/// The model listing route for `base_url`.
pub fn models_endpoint(base_url: &str) -> String {
    format!("{}/models", normalize_base_url(base_url))
}
