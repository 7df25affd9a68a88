use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::error::ApiError;

/// Adds the CSRF token header to mutating requests.
///
/// POST, PUT, PATCH and DELETE get the header; every other verb passes
/// through with its headers untouched.
#[derive(Debug, Clone)]
pub struct CsrfInterceptor {
    header: HeaderName,
    token: HeaderValue,
}

impl CsrfInterceptor {
    pub fn new(header: &str, token: &str) -> Result<Self, ApiError> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| ApiError::validation(format!("invalid CSRF header name {:?}: {}", header, e)))?;
        let token = HeaderValue::from_str(token)
            .map_err(|e| ApiError::validation(format!("invalid CSRF token: {}", e)))?;
        Ok(Self { header, token })
    }

    pub fn is_mutation(method: &Method) -> bool {
        matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }

    pub fn apply(&self, method: &Method, headers: &mut HeaderMap) {
        if Self::is_mutation(method) {
            headers.insert(self.header.clone(), self.token.clone());
        }
    }
}

