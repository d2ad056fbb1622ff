//! Semantic outcomes and the result encoder
//!
//! Domain code states *what happened* — a value, a creation, nothing to
//! return, a known absence — and the encoder owns the mapping to status,
//! headers and body. The [`Outcome`] variant set is closed, so every branch
//! of an alternation tree encodes through the same exhaustive match.

use crate::response::{Response, StatusCode};
use bytes::Bytes;
use serde::Serialize;
use squall_endpoint::{Either, ExtractError, Failure};

/// Semantic outcome of a matched, resolved endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200 with an encoded JSON body
    Ok(Bytes),
    /// 201 with an encoded JSON body
    Created(Bytes),
    /// 204, no body
    NoContent,
    /// 404 expressed as a value rather than a failure
    NotFound(String),
}

impl Outcome {
    /// A 200 outcome carrying `value` encoded as JSON
    pub fn json<T: Serialize>(value: &T) -> Result<Outcome, Failure> {
        Ok(Outcome::Ok(encode_json(value)?))
    }

    /// A 201 outcome carrying `value` encoded as JSON
    pub fn created<T: Serialize>(value: &T) -> Result<Outcome, Failure> {
        Ok(Outcome::Created(encode_json(value)?))
    }

    /// A 204 outcome
    pub fn no_content() -> Outcome {
        Outcome::NoContent
    }

    /// A 404 outcome with a human-readable message
    pub fn not_found(message: impl Into<String>) -> Outcome {
        Outcome::NotFound(message.into())
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<Bytes, Failure> {
    let encoded = serde_json::to_vec(value).map_err(|e| {
        // an unencodable domain value is a server-side defect, surfaced
        // through the table's generic fallback
        Failure::domain(EncodeError(e.to_string()))
    })?;
    Ok(Bytes::from(encoded))
}

/// Domain-value serialization failure
#[derive(Debug, thiserror::Error)]
#[error("response encoding failed: {0}")]
pub struct EncodeError(String);

/// Conversion into a semantic outcome, implemented by [`Outcome`] itself and
/// by [`Either`] trees over it
pub trait IntoOutcome: Send + 'static {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl<A: IntoOutcome, B: IntoOutcome> IntoOutcome for Either<A, B> {
    fn into_outcome(self) -> Outcome {
        match self {
            Either::Left(a) => a.into_outcome(),
            Either::Right(b) => b.into_outcome(),
        }
    }
}

/// Encode a semantic outcome into a concrete response
pub fn encode(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Ok(body) => Response::json(StatusCode::OK, body),
        Outcome::Created(body) => Response::json(StatusCode::CREATED, body),
        Outcome::NoContent => Response::new(StatusCode::NO_CONTENT),
        Outcome::NotFound(message) => Response::json(
            StatusCode::NOT_FOUND,
            serde_json::to_vec(&serde_json::json!({ "error": message }))
                .unwrap_or_else(|_| br#"{"error":"not_found"}"#.to_vec()),
        ),
    }
}

/// Translate an extraction failure into its fixed 400 response
///
/// Body shape: `{"error": <tag>, ...item}` where the item names the query
/// parameter, rule, body or file field that failed.
pub fn encode_extract_error(err: &ExtractError) -> Response {
    let body = match err {
        ExtractError::ParamMissing { param } => {
            serde_json::json!({ "error": err.tag(), "param": param })
        }
        ExtractError::RuleViolation { param, rule } => {
            serde_json::json!({ "error": err.tag(), "param": param, "rule": rule })
        }
        ExtractError::BodyNotPresent => serde_json::json!({ "error": err.tag() }),
        // the decoder detail stays in the logs, not on the wire
        ExtractError::BodyNotParsed { .. } => serde_json::json!({ "error": err.tag() }),
        ExtractError::FileMissing { field } => {
            serde_json::json!({ "error": err.tag(), "field": field })
        }
    };
    Response::json(
        StatusCode::BAD_REQUEST,
        serde_json::to_vec(&body).unwrap_or_default(),
    )
}
