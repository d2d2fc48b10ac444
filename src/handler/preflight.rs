use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::headers;
use crate::metrics::consts as crate_metrics;

/// Answers every `OPTIONS` request, whatever the path.
pub(crate) fn preflight() -> Response {
    metrics::counter!(crate_metrics::PROXY_PREFLIGHT).increment(1);
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, headers::ALLOW_ORIGIN_ANY),
            (header::ACCESS_CONTROL_ALLOW_METHODS, headers::PREFLIGHT_ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, headers::PREFLIGHT_ALLOW_HEADERS),
        ],
    )
        .into_response()
}
