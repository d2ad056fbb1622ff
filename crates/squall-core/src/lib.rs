//! squall-core: endpoint compiler and dispatch core
//!
//! Sits on top of `squall-endpoint`: takes a composed endpoint tree, an
//! error-translation table and optional filters, and produces a single async
//! request-to-response function.
//!
//! ## Layers
//! - `response` - status codes, responses, builders
//! - `outcome` - semantic outcomes and the result encoder
//! - `rescue` - the ordered error table
//! - `service` - the compiler / per-request dispatcher
//! - `middleware` - filters over services and chained async stages

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod middleware;
pub mod outcome;
pub mod rescue;
pub mod response;
pub mod service;

// Re-exports
pub use middleware::{Filter, Stage, Trace};
pub use outcome::{encode, IntoOutcome, Outcome};
pub use rescue::Rescue;
pub use response::{Response, ResponseBuilder, StatusCode};
pub use service::{compile, Service};

// The endpoint algebra, re-exported so callers depend on one crate
pub use squall_endpoint as endpoint;
