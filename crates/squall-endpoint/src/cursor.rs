//! Request Cursor
//!
//! An immutable view of a request plus how much of its path has been
//! consumed by matching so far. Advancing produces a new cursor; the shared
//! `Arc<Request>` keeps that allocation-free, so a combinator tree can fork
//! cursors freely while trying alternatives.

use crate::request::Request;
use std::sync::Arc;

/// Immutable snapshot of a request plus a consumed-prefix index
#[derive(Debug, Clone)]
pub struct Cursor {
    request: Arc<Request>,
    consumed: usize,
}

impl Cursor {
    /// Create a cursor at the start of the request path
    pub fn new(request: Request) -> Self {
        Self {
            request: Arc::new(request),
            consumed: 0,
        }
    }

    /// The underlying request
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// A shared handle to the request, for futures that outlive the cursor
    pub fn request_arc(&self) -> Arc<Request> {
        Arc::clone(&self.request)
    }

    /// The path segment at the current position, `None` past the end
    pub fn segment(&self) -> Option<&str> {
        self.request.segments.get(self.consumed).map(|s| s.as_str())
    }

    /// How many segments have been consumed
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// A new cursor with one more segment consumed
    ///
    /// Only meaningful when `segment()` returned `Some`; the index never
    /// exceeds the segment count because matchers advance at most past the
    /// segment they just inspected.
    pub fn advance(&self) -> Cursor {
        debug_assert!(self.consumed < self.request.segments.len());
        Cursor {
            request: Arc::clone(&self.request),
            consumed: self.consumed + 1,
        }
    }

    /// Whether the whole path has been consumed
    pub fn at_end(&self) -> bool {
        self.consumed == self.request.segments.len()
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.consumed == other.consumed
            && (Arc::ptr_eq(&self.request, &other.request) || *self.request == *other.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    #[test]
    fn test_advance_is_persistent() {
        let cursor = Cursor::new(Request::new(Method::Get, "/pet/42"));
        let next = cursor.advance();

        // the original is untouched
        assert_eq!(cursor.segment(), Some("pet"));
        assert_eq!(cursor.consumed(), 0);

        assert_eq!(next.segment(), Some("42"));
        assert_eq!(next.consumed(), 1);
        assert!(next.advance().at_end());
    }

    #[test]
    fn test_segment_past_end() {
        let cursor = Cursor::new(Request::new(Method::Get, "/"));
        assert!(cursor.at_end());
        assert_eq!(cursor.segment(), None);
    }

    #[test]
    fn test_cursor_equality() {
        let cursor = Cursor::new(Request::new(Method::Get, "/pet/42"));
        let a = cursor.advance();
        let b = cursor.advance();
        assert_eq!(a, b);
        assert_ne!(a, cursor);
    }
}
