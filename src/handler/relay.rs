use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};

use super::forward::ForwardResponse;
use super::headers;

/// Upstream headers minus the deny-list. Repeated headers keep every value.
fn relayable_headers(upstream_headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(upstream_headers.len() + 2);
    for (name, value) in upstream_headers {
        if !headers::is_relay_denied(name) {
            relayed.append(name.clone(), value.clone());
        }
    }
    relayed
}

impl IntoResponse for ForwardResponse {
    fn into_response(self) -> Response {
        let mut proxy_response_headers = relayable_headers(&self.headers);
        proxy_response_headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(headers::ALLOW_ORIGIN_ANY),
        );
        proxy_response_headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(headers::RELAY_ALLOW_HEADERS),
        );

        // Built by hand so no default content type sneaks in.
        let mut proxy_response = Response::new(Body::from(self.body));
        *proxy_response.status_mut() = self.status;
        *proxy_response.headers_mut() = proxy_response_headers;
        proxy_response
    }
}
