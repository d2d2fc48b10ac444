use axum::{
    extract::{Request, State},
    http::Method,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tracing::instrument;

use super::middleware as handler_middleware;
use super::state::ProxyState;
use super::{preflight, proxy, static_files};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Preflight,
    Proxy,
    Static,
}

/// `OPTIONS` wins over everything; the proxy prefix is a plain string
/// prefix of the path, so `/proxyfoo` matches `/proxy` too.
pub(crate) fn classify(method: &Method, path: &str, proxy_prefix: &str) -> Route {
    match *method {
        Method::OPTIONS => Route::Preflight,
        Method::GET if path.starts_with(proxy_prefix) => Route::Proxy,
        _ => Route::Static,
    }
}

fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[instrument(skip_all, fields(request_id=uuid()))]
pub(crate) async fn dispatch(State(state): State<ProxyState>, client_request: Request) -> Response {
    let route = classify(
        client_request.method(),
        client_request.uri().path(),
        &state.config.proxy_prefix,
    );
    tracing::debug!(
        ?route,
        method = %client_request.method(),
        path = client_request.uri().path(),
    );

    match route {
        Route::Preflight => preflight::preflight(),
        Route::Proxy => proxy::proxy(&state, client_request).await.into_response(),
        Route::Static => static_files::serve(&state, client_request).await,
    }
}

pub(crate) fn app(state: ProxyState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(middleware::from_fn(handler_middleware::metrics))
        .with_state(state)
}
