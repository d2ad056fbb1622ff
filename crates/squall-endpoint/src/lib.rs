//! squall-endpoint: composable HTTP endpoint combinators
//!
//! The matching layer of squall. An [`Endpoint`] is a typed, asynchronous,
//! partial matcher over a request: it inspects an immutable [`Cursor`] and
//! either declines or yields an advanced cursor plus a deferred value.
//! Primitive matchers cover method, path, query, body and file fields;
//! [`EndpointExt`] composes them with `and`/`or`/`map`/`and_then`.
//!
//! Matching is pure and synchronous; effects run only inside the deferred
//! value of a confirmed match. Trees are built once and shared read-only
//! across concurrent requests.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod body;
pub mod combine;
pub mod cursor;
pub mod endpoint;
pub mod error;
pub mod method;
pub mod path;
pub mod query;
pub mod request;

// Re-exports
pub use combine::{reject, value, Either, EndpointExt};
pub use cursor::Cursor;
pub use endpoint::{BoxedEndpoint, Endpoint, FutureValue, Matched};
pub use error::{Error, ExtractError, Failure, Fault, Result};
pub use request::{Method, Request, RequestBuilder};
