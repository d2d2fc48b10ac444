use axum::http::{header, HeaderName};

pub(crate) const API_KEY_HEADER_KEY: &str = "x-api-key";

pub(crate) const URL_QUERY_KEY: &str = "url";
pub(crate) const API_KEY_QUERY_KEY: &str = "apiKey";

pub(crate) const ALLOW_ORIGIN_ANY: &str = "*";
pub(crate) const RELAY_ALLOW_HEADERS: &str = "x-api-key";
pub(crate) const PREFLIGHT_ALLOW_METHODS: &str = "GET, OPTIONS";
pub(crate) const PREFLIGHT_ALLOW_HEADERS: &str = "x-api-key, Content-Type";

// The proxy sets its own origin header, and buffering the body invalidates
// the upstream framing.
pub(crate) const RELAY_DENIED_HEADERS: [HeaderName; 4] = [
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    header::CONTENT_ENCODING,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
];

/// Header names are normalised to lowercase on parse, so equality here is
/// already case-insensitive.
pub(crate) fn is_relay_denied(name: &HeaderName) -> bool {
    RELAY_DENIED_HEADERS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_list_ignores_case() {
        for name in [
            "Access-Control-Allow-Origin",
            "CONTENT-ENCODING",
            "Content-Length",
            "transfer-encoding",
        ] {
            let name = HeaderName::from_bytes(name.as_bytes()).unwrap();
            assert!(is_relay_denied(&name), "{name} should be denied");
        }
    }

    #[test]
    fn deny_list_passes_everything_else() {
        assert!(!is_relay_denied(&header::CONTENT_TYPE));
        assert!(!is_relay_denied(&header::SET_COOKIE));
        assert!(!is_relay_denied(&header::ACCESS_CONTROL_ALLOW_HEADERS));
        assert!(!is_relay_denied(&header::CACHE_CONTROL));
    }
}
