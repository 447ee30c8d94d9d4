//! Explicit per-request context: the slice of the inbound request the
//! dispatch layer needs, instead of reaching into framework globals.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::AppState;

#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Full URL the client used to reach this handler, query string excluded.
    pub url: String,
    pub headers: HeaderMap,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let headers = parts.headers.clone();
        let url = observed_url(&headers, &path, state.cfg.forwarded_headers);
        Ok(RequestContext { url, headers })
    }
}

/// Reconstructs the absolute URL of the inbound request. The server itself
/// only speaks plain HTTP; a terminating proxy announces the outer scheme
/// and host via forwarded headers, honored only when configured.
fn observed_url(headers: &HeaderMap, path: &str, forwarded: bool) -> String {
    let mut scheme = "http";
    let mut host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    if forwarded {
        if let Some(proto) = headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()) {
            scheme = proto;
        }
        if let Some(fwd) = headers.get("x-forwarded-host").and_then(|v| v.to_str().ok()) {
            host = fwd;
        }
    }
    format!("{}://{}{}", scheme, host, path)
}

#[cfg(test)]
mod tests {
    use super::observed_url;
    use axum::http::HeaderMap;

    fn headers() -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("host", "localhost:8080".parse().unwrap());
        h.insert("x-forwarded-proto", "https".parse().unwrap());
        h.insert("x-forwarded-host", "edge.example".parse().unwrap());
        h
    }

    #[test]
    fn uses_the_host_header_by_default() {
        let url = observed_url(&headers(), "/api/test/echo-url", false);
        assert_eq!(url, "http://localhost:8080/api/test/echo-url");
    }

    #[test]
    fn honors_forwarded_headers_when_configured() {
        let url = observed_url(&headers(), "/api/test/echo-url", true);
        assert_eq!(url, "https://edge.example/api/test/echo-url");
    }
}
