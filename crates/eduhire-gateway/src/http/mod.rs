pub mod courses;
pub mod health;
pub mod jobs;
pub mod users;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parse an optional JSON body. An empty body yields `T::default()`.
pub(crate) fn optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Parse a required JSON body, reporting malformed input as a 400.
pub(crate) fn required_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
