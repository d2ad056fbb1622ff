//! Error types for squall-endpoint
//!
//! Three distinct notions, kept apart on purpose:
//! - a structural non-match is `None` in the algebra and never an error,
//! - an [`ExtractError`] is required data that was absent or malformed,
//! - a [`Failure`] is what the async step of a matched endpoint resolves to
//!   when it cannot produce a value, and is what the error table classifies.

use std::any::Any;
use thiserror::Error;

/// Result type alias for squall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Construction-time errors
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Extraction failure raised by a primitive matcher after a structural match
///
/// Every variant carries which item failed and why; `tag()` is the stable
/// wire identifier clients see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A required query parameter was absent (or had zero values)
    #[error("query parameter `{param}` not present")]
    ParamMissing { param: String },

    /// A query parameter value failed a named validation rule
    #[error("query parameter `{param}` violates rule `{rule}`")]
    RuleViolation { param: String, rule: String },

    /// The endpoint expects a request body and none was present
    #[error("request body not present")]
    BodyNotPresent,

    /// The request body could not be decoded into the target type
    #[error("request body not parsed: {detail}")]
    BodyNotParsed { detail: String },

    /// The declared multipart field was absent
    #[error("multipart field `{field}` not present")]
    FileMissing { field: String },
}

impl ExtractError {
    /// Stable wire tag for this failure kind
    pub fn tag(&self) -> &'static str {
        match self {
            ExtractError::ParamMissing { .. } => "param_not_present",
            ExtractError::RuleViolation { .. } => "rule_violation",
            ExtractError::BodyNotPresent => "body_not_present",
            ExtractError::BodyNotParsed { .. } => "body_not_parsed",
            ExtractError::FileMissing { .. } => "file_not_present",
        }
    }
}

/// A classifiable domain error raised by a collaborator call
///
/// Implementors are ordinary `std::error::Error` types; `as_any` lets the
/// error table recover the concrete type by downcast.
pub trait Fault: std::error::Error + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T: std::error::Error + Send + Sync + 'static> Fault for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Failure produced by the async step of a matched endpoint
#[derive(Debug, Error)]
pub enum Failure {
    /// Required request data absent, malformed, or failing a named rule
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Domain failure raised by a collaborator after a successful match
    #[error("{0}")]
    Domain(Box<dyn Fault>),
}

impl Failure {
    /// Wrap a domain error
    pub fn domain<E: Fault>(err: E) -> Self {
        Failure::Domain(Box::new(err))
    }

    /// The extraction error, if this is one
    pub fn extract_ref(&self) -> Option<&ExtractError> {
        match self {
            Failure::Extract(e) => Some(e),
            Failure::Domain(_) => None,
        }
    }

    /// The domain error downcast to `T`, if this is one
    pub fn fault_ref<T: Fault>(&self) -> Option<&T> {
        match self {
            Failure::Domain(f) => f.as_any().downcast_ref::<T>(),
            Failure::Extract(_) => None,
        }
    }
}
