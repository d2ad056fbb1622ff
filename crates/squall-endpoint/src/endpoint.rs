//! The Endpoint abstraction
//!
//! An endpoint is a typed, asynchronous, partial function over a request:
//! applied to a [`Cursor`] it either declines (`None`, a structural
//! non-match) or yields the cursor it advanced to plus a deferred value.
//! Application itself is pure and synchronous; all effects live inside the
//! returned future, which resolves at most once and belongs to exactly one
//! request.

use crate::cursor::Cursor;
use crate::error::Failure;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Deferred value produced by a matched endpoint
pub type FutureValue<A> = BoxFuture<'static, Result<A, Failure>>;

/// A successful structural match: the advanced cursor plus the deferred value
pub struct Matched<A> {
    /// Cursor after this endpoint consumed its part of the path
    pub cursor: Cursor,
    /// The value, resolved later; may fail with extraction or domain errors
    pub value: FutureValue<A>,
}

impl<A> Matched<A> {
    /// Create a match from a cursor and an already-available value
    pub fn ready(cursor: Cursor, value: A) -> Self
    where
        A: Send + 'static,
    {
        Self {
            cursor,
            value: Box::pin(futures::future::ready(Ok(value))),
        }
    }

    /// Create a match whose value resolution already failed
    pub fn failed(cursor: Cursor, failure: Failure) -> Self
    where
        A: Send + 'static,
    {
        Self {
            cursor,
            value: Box::pin(futures::future::ready(Err(failure))),
        }
    }
}

/// A composable, immutable, asynchronous partial matcher over a request
///
/// `apply` must be deterministic and side-effect-free: applying the same
/// endpoint twice to equal cursors yields structurally equal outcomes. Trees
/// are built once at startup and shared read-only across concurrent
/// requests, hence the `Send + Sync` bound.
pub trait Endpoint: Send + Sync {
    /// The carried value type
    type Output: Send + 'static;

    /// Attempt a structural match at the cursor position
    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>>;
}

impl<E: Endpoint + ?Sized> Endpoint for &'static E {
    type Output = E::Output;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        (**self).apply(cursor)
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Arc<E> {
    type Output = E::Output;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        (**self).apply(cursor)
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Box<E> {
    type Output = E::Output;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        (**self).apply(cursor)
    }
}

/// Type-erased endpoint
pub type BoxedEndpoint<A> = Box<dyn Endpoint<Output = A>>;
