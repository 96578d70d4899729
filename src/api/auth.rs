//! HTTP Basic authentication into a request-scoped [`AuthContext`].
//!
//! Credentials are checked on every request; there is no server-side session.

use super::SharedState;
use crate::{
    core::user::{self, AuthContext},
    errors::Error,
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Extracts `(username, password)` from a `Basic` authorization header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

impl FromRequestParts<SharedState> for AuthContext {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) =
            basic_credentials(&parts.headers).ok_or(Error::AuthFailure)?;
        user::authenticate(&state.db, &username, &password).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_decodes_basic_header() {
        let encoded = BASE64.encode("admin:admin123");
        let headers = headers_with(&format!("Basic {encoded}"));
        assert_eq!(
            basic_credentials(&headers),
            Some(("admin".to_string(), "admin123".to_string()))
        );
    }

    #[test]
    fn test_password_may_contain_colon() {
        let encoded = BASE64.encode("zhang:a:b");
        let headers = headers_with(&format!("basic {encoded}"));
        assert_eq!(
            basic_credentials(&headers),
            Some(("zhang".to_string(), "a:b".to_string()))
        );
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
        assert_eq!(basic_credentials(&headers_with("Bearer abc")), None);
        assert_eq!(basic_credentials(&headers_with("Basic !!!")), None);
        let no_colon = BASE64.encode("admin");
        assert_eq!(
            basic_credentials(&headers_with(&format!("Basic {no_colon}"))),
            None
        );
    }
}
