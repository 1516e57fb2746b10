//! Translation of raw HTTP responses into the client's result shape.
//!
//! The body is checked for valid JSON before the status code is looked at,
//! so a non-JSON 404 reports `InvalidJson`, not `NotFound`. Reads and
//! writes use slightly different tables: only writes accept 201 and map 422.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};

/// Result of interpreting one response.
#[derive(Debug)]
pub enum Outcome {
    Success(Value),
    /// HTTP 500: the caller may re-attempt the request.
    ServerError,
    Failure(ApiError),
}

pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

pub fn interpret(method: HttpMethod, response: &HttpResponse) -> Outcome {
    let body = if method == HttpMethod::Delete && response.body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(_) => return Outcome::Failure(ApiError::InvalidJson),
        }
    };

    let write = !method.is_read();
    match response.status {
        200 => Outcome::Success(body),
        201 if write => Outcome::Success(body),
        400 => Outcome::Failure(ApiError::EndpointNotFound),
        403 => Outcome::Failure(ApiError::Unauthorized),
        404 => Outcome::Failure(ApiError::NotFound),
        422 if write => Outcome::Failure(ApiError::Unprocessable),
        500 => Outcome::ServerError,
        status => Outcome::Failure(ApiError::Unknown { status }),
    }
}

/// `interpret` for hosts that do not re-attempt: a 500 becomes an error.
pub fn into_result(method: HttpMethod, response: &HttpResponse) -> Result<Value, ApiError> {
    match interpret(method, response) {
        Outcome::Success(value) => Ok(value),
        Outcome::ServerError => Err(ApiError::ServerError { status: response.status }),
        Outcome::Failure(err) => Err(err),
    }
}
