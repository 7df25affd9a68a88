use crate::error::ApiError;

/// Percent-encodes an id for use as one path segment.
///
/// Blank ids are rejected with `missing`, so `/`, `?` and `#` inside an id
/// can never redirect the request to another endpoint.
pub fn segment(id: &str, missing: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::validation(missing));
    }
    Ok(urlencoding::encode(id).into_owned())
}

/// Percent-encodes a query-string value.
pub fn query_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
