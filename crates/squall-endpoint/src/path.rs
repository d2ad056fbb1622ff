//! Path segment matchers
//!
//! - [`literal`] — fixed segment: `/pet`
//! - [`capture`] — typed segment: `/pet/{id}`
//!
//! Both consume exactly one segment. A capture whose segment fails to parse
//! is a structural non-match, so alternation can fall through to a more
//! specific route (`/pet/findByStatus` beside `/pet/{id}`).

use crate::cursor::Cursor;
use crate::endpoint::{Endpoint, Matched};
use std::marker::PhantomData;
use std::str::FromStr;

/// Match a fixed path segment (case-sensitive), carrying no value
pub fn literal(segment: impl Into<String>) -> Literal {
    Literal {
        segment: segment.into(),
    }
}

/// Match a path segment that parses as `T`, carrying the parsed value
pub fn capture<T>() -> Capture<T>
where
    T: FromStr + Send + 'static,
{
    Capture {
        _marker: PhantomData,
    }
}

/// See [`literal`]
pub struct Literal {
    segment: String,
}

impl Endpoint for Literal {
    type Output = ();

    fn apply(&self, cursor: &Cursor) -> Option<Matched<()>> {
        if cursor.segment()? == self.segment {
            Some(Matched::ready(cursor.advance(), ()))
        } else {
            None
        }
    }
}

/// See [`capture`]
pub struct Capture<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Endpoint for Capture<T>
where
    T: FromStr + Send + 'static,
{
    type Output = T;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<T>> {
        let parsed = cursor.segment()?.parse::<T>().ok()?;
        Some(Matched::ready(cursor.advance(), parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, Request};

    fn cursor(path: &str) -> Cursor {
        Cursor::new(Request::new(Method::Get, path))
    }

    #[test]
    fn test_literal_match() {
        let ep = literal("pet");
        let matched = ep.apply(&cursor("/pet/42")).unwrap();
        assert_eq!(matched.cursor.consumed(), 1);

        assert!(ep.apply(&cursor("/store")).is_none());
        assert!(ep.apply(&cursor("/")).is_none());
    }

    #[test]
    fn test_literal_case_sensitive() {
        assert!(literal("pet").apply(&cursor("/Pet")).is_none());
    }

    #[tokio::test]
    async fn test_capture_parses() {
        let ep = capture::<u64>();
        let matched = ep.apply(&cursor("/42/next")).unwrap();
        assert_eq!(matched.cursor.consumed(), 1);
        assert_eq!(matched.value.await.unwrap(), 42);
    }

    #[test]
    fn test_capture_parse_failure_is_non_match() {
        // "abc" where an integer is expected falls through, it is not an error
        assert!(capture::<u64>().apply(&cursor("/abc")).is_none());
        assert!(capture::<u64>().apply(&cursor("/")).is_none());
    }
}
