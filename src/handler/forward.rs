use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use tracing::instrument;
use url::form_urlencoded;

use super::errors::ProxyError;
use super::headers;

/// Outbound request built from one inbound proxy request.
#[derive(Debug)]
pub(crate) struct ForwardRequest {
    pub(crate) target_url: String,
    // Only ever holds x-api-key and Accept.
    pub(crate) headers: HeaderMap,
}

/// Buffered upstream answer, whatever its status.
#[derive(Debug)]
pub(crate) struct ForwardResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

#[derive(Debug)]
pub(crate) enum Forwarded {
    Relayed(ForwardResponse),
    TransportFailure(String),
}

impl ForwardRequest {
    /// Picks the target URL and the allow-listed headers out of an inbound
    /// request. An `apiKey` query parameter overrides the `x-api-key` header
    /// so that clients which cannot set headers (image tags) still
    /// authenticate.
    pub(crate) fn from_parts(
        query: Option<&str>,
        inbound_headers: &HeaderMap,
    ) -> Result<Self, ProxyError> {
        let query = query.unwrap_or("");
        let target_url = first_query_value(query, headers::URL_QUERY_KEY)
            .ok_or(ProxyError::MissingParameter(headers::URL_QUERY_KEY))?;

        let mut outbound_headers = HeaderMap::new();
        if let Some(api_key) = inbound_headers.get(headers::API_KEY_HEADER_KEY) {
            outbound_headers.insert(headers::API_KEY_HEADER_KEY, api_key.clone());
        }
        if let Some(api_key) = first_query_value(query, headers::API_KEY_QUERY_KEY) {
            outbound_headers.insert(headers::API_KEY_HEADER_KEY, HeaderValue::from_str(&api_key)?);
        }
        if let Some(accept) = inbound_headers.get(header::ACCEPT) {
            outbound_headers.insert(header::ACCEPT, accept.clone());
        }

        Ok(Self {
            target_url,
            headers: outbound_headers,
        })
    }

    /// Issues a single GET and buffers the whole body. Error statuses are
    /// relayed, not failed; only transport problems become failures.
    #[instrument(skip_all, level = tracing::Level::DEBUG)]
    pub(crate) async fn send(self, http_client: &reqwest::Client) -> Forwarded {
        let server_response = match http_client
            .get(&self.target_url)
            .headers(self.headers)
            .send()
            .await
        {
            Ok(server_response) => server_response,
            Err(error) => return Forwarded::TransportFailure(describe(error)),
        };

        let status = server_response.status();
        let headers = server_response.headers().clone();
        match server_response.bytes().await {
            Ok(body) => Forwarded::Relayed(ForwardResponse {
                status,
                headers,
                body,
            }),
            Err(error) => Forwarded::TransportFailure(describe(error)),
        }
    }
}

// First non-empty value, with `+` decoded as a space.
fn first_query_value(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

fn describe(error: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::from(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|&(k, v)| (header::HeaderName::from_static(k), HeaderValue::from_static(v)))
            .collect()
    }

    #[test]
    fn missing_url_is_rejected() {
        for query in [None, Some(""), Some("apiKey=K1"), Some("url="), Some("urls=x")] {
            let result = ForwardRequest::from_parts(query, &HeaderMap::new());
            assert!(
                matches!(result, Err(ProxyError::MissingParameter("url"))),
                "query {query:?} should be rejected"
            );
        }
    }

    #[test]
    fn url_is_decoded_and_first_value_wins() {
        let request = ForwardRequest::from_parts(
            Some("url=http%3A%2F%2Fexample.com%2Fa%3Fb%3Dc&url=http://other"),
            &HeaderMap::new(),
        )
        .unwrap();
        assert_eq!(request.target_url, "http://example.com/a?b=c");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn query_api_key_overrides_header() {
        let request = ForwardRequest::from_parts(
            Some("url=http://x/img.png&apiKey=K1"),
            &inbound(&[("x-api-key", "K2")]),
        )
        .unwrap();
        assert_eq!(request.headers["x-api-key"], "K1");
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn header_api_key_is_forwarded_unchanged() {
        let request = ForwardRequest::from_parts(
            Some("url=http://x/data"),
            &inbound(&[("x-api-key", "K2")]),
        )
        .unwrap();
        assert_eq!(request.headers["x-api-key"], "K2");
    }

    #[test]
    fn only_allow_listed_headers_survive() {
        let request = ForwardRequest::from_parts(
            Some("url=http://x/data"),
            &inbound(&[
                ("accept", "application/json"),
                ("authorization", "Bearer secret"),
                ("cookie", "session=1"),
                ("host", "localhost:8000"),
                ("user-agent", "browser"),
            ]),
        )
        .unwrap();
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[header::ACCEPT], "application/json");
    }

    #[test]
    fn unencodable_api_key_is_unexpected() {
        let result = ForwardRequest::from_parts(
            Some("url=http://x/data&apiKey=bad%0Akey"),
            &HeaderMap::new(),
        );
        assert!(matches!(result, Err(ProxyError::Unexpected(_))));
    }

    #[tokio::test]
    async fn malformed_target_is_transport_failure() {
        let request = ForwardRequest {
            target_url: "not a url".to_string(),
            headers: HeaderMap::new(),
        };
        let forwarded = request.send(&reqwest::Client::new()).await;
        match forwarded {
            Forwarded::TransportFailure(description) => assert!(!description.is_empty()),
            Forwarded::Relayed(response) => panic!("unexpected relay: {response:?}"),
        }
    }
}
