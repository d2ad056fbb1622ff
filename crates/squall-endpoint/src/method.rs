//! Method guards
//!
//! A guard matches iff the request carries the declared method. It never
//! consumes path segments, so it composes freely before or after path
//! matchers.

use crate::cursor::Cursor;
use crate::endpoint::{Endpoint, Matched};
use crate::request::Method;

/// Match a specific HTTP method, carrying no value
pub fn verb(method: Method) -> Verb {
    Verb { method }
}

/// Match GET
pub fn get() -> Verb {
    verb(Method::Get)
}

/// Match POST
pub fn post() -> Verb {
    verb(Method::Post)
}

/// Match PUT
pub fn put() -> Verb {
    verb(Method::Put)
}

/// Match DELETE
pub fn delete() -> Verb {
    verb(Method::Delete)
}

/// Match PATCH
pub fn patch() -> Verb {
    verb(Method::Patch)
}

/// Match HEAD
pub fn head() -> Verb {
    verb(Method::Head)
}

/// Match OPTIONS
pub fn options() -> Verb {
    verb(Method::Options)
}

/// See [`verb`]
pub struct Verb {
    method: Method,
}

impl Endpoint for Verb {
    type Output = ();

    fn apply(&self, cursor: &Cursor) -> Option<Matched<()>> {
        if cursor.request().method == self.method {
            Some(Matched::ready(cursor.clone(), ()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    #[test]
    fn test_verb_guard() {
        let cursor = Cursor::new(Request::new(Method::Get, "/pet"));

        let matched = get().apply(&cursor).unwrap();
        // the path position is untouched
        assert_eq!(matched.cursor.consumed(), 0);

        assert!(post().apply(&cursor).is_none());
        assert!(delete().apply(&cursor).is_none());
    }
}
