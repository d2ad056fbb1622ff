//! The combinator algebra
//!
//! Named builders, no operator overloading:
//! - [`EndpointExt::and`] / [`EndpointExt::left`] / [`EndpointExt::right`] —
//!   sequential composition
//! - [`EndpointExt::or`] — first-structural-match-wins alternation
//! - [`EndpointExt::map`] / [`EndpointExt::and_then`] — value transforms
//! - [`reject`] — the identity of `or`
//! - [`value`] — an always-matching constant
//!
//! Alternation picks its branch synchronously, before any async work: a
//! failure inside the chosen branch's async step never retries a sibling.

use crate::cursor::Cursor;
use crate::endpoint::{Endpoint, Matched};
use crate::error::Failure;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Tagged union of alternation results
///
/// Carries exactly one branch's value, tagged with which branch matched, so
/// a downstream encoder can route each branch to its own handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<A, B> {
    /// The left branch matched
    Left(A),
    /// The right branch matched
    Right(B),
}

/// The endpoint that matches nothing; identity element of `or`
pub fn reject<A: Send + 'static>() -> Reject<A> {
    Reject {
        _marker: PhantomData,
    }
}

/// An endpoint that always matches, carrying a cloned constant
///
/// The explicit adapter for using a bare value where an endpoint is
/// expected.
pub fn value<A>(value: A) -> Value<A>
where
    A: Clone + Send + Sync + 'static,
{
    Value { value }
}

/// Builder methods available on every endpoint
pub trait EndpointExt: Endpoint + Sized {
    /// Sequential composition: both must match, yielding the pair
    ///
    /// The right side sees the cursor the left side advanced to; a left
    /// non-match short-circuits without attempting the right side.
    fn and<E: Endpoint>(self, other: E) -> And<Self, E> {
        And {
            left: self,
            right: other,
        }
    }

    /// Sequence like [`EndpointExt::and`], keeping only the left value
    fn left<E: Endpoint>(self, other: E) -> KeepLeft<Self, E> {
        KeepLeft {
            left: self,
            right: other,
        }
    }

    /// Sequence like [`EndpointExt::and`], keeping only the right value
    fn right<E: Endpoint>(self, other: E) -> KeepRight<Self, E> {
        KeepRight {
            left: self,
            right: other,
        }
    }

    /// Alternation: the first branch to match structurally wins
    fn or<E: Endpoint>(self, other: E) -> Or<Self, E> {
        Or {
            left: self,
            right: other,
        }
    }

    /// Transform the carried value with a pure function
    fn map<F, B>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        Map { inner: self, f: Arc::new(f) }
    }

    /// Feed the carried value into an async step, such as a store call
    fn and_then<F, Fut, B>(self, f: F) -> AndThen<Self, F>
    where
        F: Fn(Self::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<B, Failure>> + Send + 'static,
        B: Send + 'static,
    {
        AndThen { inner: self, f: Arc::new(f) }
    }

    /// Erase the concrete combinator type
    fn boxed(self) -> Box<dyn Endpoint<Output = Self::Output>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<E: Endpoint + Sized> EndpointExt for E {}

/// See [`EndpointExt::and`]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<L: Endpoint, R: Endpoint> Endpoint for And<L, R> {
    type Output = (L::Output, R::Output);

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        let first = self.left.apply(cursor)?;
        let second = self.right.apply(&first.cursor)?;
        Some(Matched {
            cursor: second.cursor,
            value: Box::pin(async move {
                let a = first.value.await?;
                let b = second.value.await?;
                Ok((a, b))
            }),
        })
    }
}

/// See [`EndpointExt::left`]
pub struct KeepLeft<L, R> {
    left: L,
    right: R,
}

impl<L: Endpoint, R: Endpoint> Endpoint for KeepLeft<L, R> {
    type Output = L::Output;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        let first = self.left.apply(cursor)?;
        let second = self.right.apply(&first.cursor)?;
        Some(Matched {
            cursor: second.cursor,
            value: Box::pin(async move {
                let a = first.value.await?;
                second.value.await?;
                Ok(a)
            }),
        })
    }
}

/// See [`EndpointExt::right`]
pub struct KeepRight<L, R> {
    left: L,
    right: R,
}

impl<L: Endpoint, R: Endpoint> Endpoint for KeepRight<L, R> {
    type Output = R::Output;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        let first = self.left.apply(cursor)?;
        let second = self.right.apply(&first.cursor)?;
        Some(Matched {
            cursor: second.cursor,
            value: Box::pin(async move {
                first.value.await?;
                second.value.await
            }),
        })
    }
}

/// See [`EndpointExt::or`]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<L: Endpoint, R: Endpoint> Endpoint for Or<L, R> {
    type Output = Either<L::Output, R::Output>;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Self::Output>> {
        if let Some(matched) = self.left.apply(cursor) {
            return Some(Matched {
                cursor: matched.cursor,
                value: Box::pin(async move { Ok(Either::Left(matched.value.await?)) }),
            });
        }
        let matched = self.right.apply(cursor)?;
        Some(Matched {
            cursor: matched.cursor,
            value: Box::pin(async move { Ok(Either::Right(matched.value.await?)) }),
        })
    }
}

/// See [`EndpointExt::map`]
pub struct Map<E, F> {
    inner: E,
    f: Arc<F>,
}

impl<E, F, B> Endpoint for Map<E, F>
where
    E: Endpoint,
    F: Fn(E::Output) -> B + Send + Sync + 'static,
    B: Send + 'static,
{
    type Output = B;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<B>> {
        let matched = self.inner.apply(cursor)?;
        let f = Arc::clone(&self.f);
        Some(Matched {
            cursor: matched.cursor,
            value: Box::pin(async move { Ok(f(matched.value.await?)) }),
        })
    }
}

/// See [`EndpointExt::and_then`]
pub struct AndThen<E, F> {
    inner: E,
    f: Arc<F>,
}

impl<E, F, Fut, B> Endpoint for AndThen<E, F>
where
    E: Endpoint,
    F: Fn(E::Output) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<B, Failure>> + Send + 'static,
    B: Send + 'static,
{
    type Output = B;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<B>> {
        let matched = self.inner.apply(cursor)?;
        let f = Arc::clone(&self.f);
        Some(Matched {
            cursor: matched.cursor,
            value: Box::pin(async move { f(matched.value.await?).await }),
        })
    }
}

/// See [`reject`]
pub struct Reject<A> {
    _marker: PhantomData<fn() -> A>,
}

impl<A: Send + 'static> Endpoint for Reject<A> {
    type Output = A;

    fn apply(&self, _cursor: &Cursor) -> Option<Matched<A>> {
        None
    }
}

/// See [`value`]
pub struct Value<A> {
    value: A,
}

impl<A> Endpoint for Value<A>
where
    A: Clone + Send + Sync + 'static,
{
    type Output = A;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<A>> {
        Some(Matched::ready(cursor.clone(), self.value.clone()))
    }
}
