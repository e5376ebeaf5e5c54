//! Request base URL, used to turn stored media paths into absolute URLs.

use axum::{
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};
use std::convert::Infallible;

/// `scheme://host` of the current request
///
/// The scheme comes from `X-Forwarded-Proto` (default `http`), the host from
/// the `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    /// Prefix a stored path like `/uploads/x.png`; absolute URLs pass through.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    pub fn absolute_opt(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.absolute(p))
    }
}

impl<S> FromRequestParts<S> for BaseUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(BaseUrl(format!("{scheme}://{host}")))
    }
}
