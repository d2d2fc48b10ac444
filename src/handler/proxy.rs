use super::errors::ProxyError;
use super::forward::{ForwardRequest, ForwardResponse, Forwarded};
use super::headers;
use super::state::ProxyState;
use crate::metrics::consts as crate_metrics;

use axum::extract::Request;
use std::time::Instant;
use tracing::instrument;

#[instrument(skip_all, err(Display), level = tracing::Level::DEBUG)]
pub(crate) async fn proxy(
    state: &ProxyState,
    client_request: Request,
) -> Result<ForwardResponse, ProxyError> {
    let forward_request = ForwardRequest::from_parts(
        client_request.uri().query(),
        client_request.headers(),
    )
    .inspect_err(|error| {
        if let ProxyError::MissingParameter(_) = error {
            metrics::counter!(crate_metrics::PROXY_MISSING_PARAMETER).increment(1);
        }
    })?;

    // Header values may be credentials, so only their presence is logged.
    let target_url = forward_request.target_url.clone();
    tracing::debug!(
        target_url,
        api_key_forwarded = forward_request.headers.contains_key(headers::API_KEY_HEADER_KEY),
        "Forwarding request upstream."
    );

    let reqwest_start = Instant::now();
    let forwarded = forward_request.send(&state.http_client).await;
    metrics::histogram!(crate_metrics::UPSTREAM_REQUEST_DURATION_SECS)
        .record(reqwest_start.elapsed().as_secs_f64());

    match forwarded {
        Forwarded::Relayed(server_response) => {
            tracing::info!(
                server_response_status = %server_response.status,
                target_url,
                body_bytes = server_response.body.len(),
            );
            Ok(server_response)
        }
        Forwarded::TransportFailure(description) => {
            metrics::counter!(crate_metrics::UPSTREAM_TRANSPORT_FAILURE).increment(1);
            tracing::warn!(target_url, description, "Upstream call failed.");
            Err(ProxyError::Unexpected(anyhow::Error::msg(description)))
        }
    }
}
