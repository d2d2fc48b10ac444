use axum::{
    http::{self, header},
    response::{IntoResponse, Response},
};

use super::headers;

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyError::MissingParameter(name) => write!(f, "Missing '{name}' parameter"),
            ProxyError::Unexpected(error) => write!(f, "{error:#}"),
        }
    }
}

#[derive(Debug)]
pub(crate) enum ProxyError {
    MissingParameter(&'static str),
    Unexpected(anyhow::Error),
}

impl ProxyError {
    pub(crate) fn status(&self) -> http::StatusCode {
        match self {
            ProxyError::MissingParameter(_) => http::StatusCode::BAD_REQUEST,
            ProxyError::Unexpected(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            ProxyError::MissingParameter(_) => self.to_string(),
            ProxyError::Unexpected(_) => format!("ERROR: {self}"),
        };
        (
            self.status(),
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, headers::ALLOW_ORIGIN_ANY)],
            body,
        )
            .into_response()
    }
}

impl<E> From<E> for ProxyError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Unexpected(err.into())
    }
}
