use axum::{body::Body, extract::Request, response::Response};
use tower::ServiceExt;

use super::state::ProxyState;

/// Fallback for every request that is neither pre-flight nor proxy.
pub(crate) async fn serve(state: &ProxyState, request: Request) -> Response {
    match state.static_files.clone().oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
