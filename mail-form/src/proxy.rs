use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, StatusCode, Uri},
    response::Response,
};
use std::time::Duration;

pub const API_PREFIX: &str = "/api";

// Per-connection headers; each leg sets its own
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    RequestBody(axum::Error),

    #[error("mail relay unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl ProxyError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Drops the `/api` prefix, keeping the query string.
pub fn rewrite_path(path_and_query: &str) -> &str {
    match path_and_query.strip_prefix(API_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') => rest,
        _ => path_and_query,
    }
}

/// Development proxy: `/api/<rest>` on the form server becomes `<relay>/<rest>`.
#[derive(Clone)]
pub struct Proxy {
    relay_base_url: String,
    client: reqwest::Client,
}

impl Proxy {
    pub fn new(relay_base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            relay_base_url: relay_base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn upstream_url(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map_or("", |p| p.as_str());
        format!("{}{}", self.relay_base_url, rewrite_path(path_and_query))
    }

    pub async fn forward_request(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::RequestBody)?;

        let url = self.upstream_url(&parts.uri);
        tracing::debug!("Proxying {} {} to {}", parts.method, parts.uri, url);

        let mut headers = parts.headers;
        for name in HOP_BY_HOP_HEADERS {
            headers.remove(name);
        }

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        into_response(upstream).await
    }
}

/// Copies status, end-to-end headers (repeated ones included) and body.
async fn into_response(upstream: reqwest::Response) -> Result<Response, ProxyError> {
    tracing::debug!("Relay answered {}", upstream.status());

    let mut builder = Response::builder().status(upstream.status());
    for (name, value) in upstream
        .headers()
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name))
    {
        builder = builder.header(name, value);
    }

    let body = upstream.bytes().await?;
    Ok(builder.body(Body::from(body))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_api_prefix() {
        assert_eq!(rewrite_path("/api/send-email"), "/send-email");
        assert_eq!(rewrite_path("/api/send-email?x=1"), "/send-email?x=1");
        assert_eq!(rewrite_path("/api"), "");
    }

    #[test]
    fn leaves_lookalike_paths_alone() {
        assert_eq!(rewrite_path("/apix/send-email"), "/apix/send-email");
        assert_eq!(rewrite_path("/send-email"), "/send-email");
    }

    #[test]
    fn upstream_url_joins_base_and_rewritten_path() {
        let proxy = Proxy::new("http://relay:4566/").unwrap();
        let uri: Uri = "/api/send-email?x=1".parse().unwrap();
        assert_eq!(proxy.upstream_url(&uri), "http://relay:4566/send-email?x=1");
    }

    #[test]
    fn failures_map_to_statuses() {
        let err = ProxyError::RequestBody(axum::Error::new("boom"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
