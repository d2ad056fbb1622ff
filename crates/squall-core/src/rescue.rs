//! The error table
//!
//! An ordered registry translating classified failures into responses.
//! Entries are consulted in registration order, first match wins; extraction
//! failures have a built-in translation after the registered entries, and
//! anything still unclassified maps to a generic 500 that leaks nothing.

use crate::outcome::encode_extract_error;
use crate::response::{Response, StatusCode};
use squall_endpoint::{Failure, Fault};

type Entry = Box<dyn Fn(&Failure) -> Option<Response> + Send + Sync>;

/// Ordered error-translation table, registered once at startup
#[derive(Default)]
pub struct Rescue {
    entries: Vec<Entry>,
}

impl Rescue {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw predicate entry
    pub fn on<F>(mut self, entry: F) -> Self
    where
        F: Fn(&Failure) -> Option<Response> + Send + Sync + 'static,
    {
        self.entries.push(Box::new(entry));
        self
    }

    /// Register a translation for one concrete domain error type
    pub fn on_fault<T, F>(self, translate: F) -> Self
    where
        T: Fault,
        F: Fn(&T) -> Response + Send + Sync + 'static,
    {
        self.on(move |failure| failure.fault_ref::<T>().map(&translate))
    }

    /// Translate a failure into a response
    ///
    /// Registered entries first, then the built-in extraction translation,
    /// then the generic fallback.
    pub fn translate(&self, failure: &Failure) -> Response {
        for entry in &self.entries {
            if let Some(response) = entry(failure) {
                return response;
            }
        }
        if let Some(extract) = failure.extract_ref() {
            return encode_extract_error(extract);
        }
        tracing::error!(error = %failure, "unclassified failure");
        Response::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"internal"}"#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squall_endpoint::ExtractError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("pet {0} not found")]
    struct PetNotFound(u64);

    #[derive(Debug, Error)]
    #[error("pet already exists")]
    struct Duplicate;

    #[test]
    fn test_registration_order_first_match_wins() {
        let rescue = Rescue::new()
            .on(|_| {
                Some(Response::text(StatusCode::CONFLICT, "first"))
            })
            .on_fault::<PetNotFound, _>(|_| Response::new(StatusCode::NOT_FOUND));

        // the blanket first entry shadows the later typed one
        let res = rescue.translate(&Failure::domain(PetNotFound(7)));
        assert_eq!(res.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_typed_entry_translates_by_downcast() {
        let rescue = Rescue::new()
            .on_fault::<Duplicate, _>(|_| Response::new(StatusCode::CONFLICT))
            .on_fault::<PetNotFound, _>(|e| {
                Response::json(
                    StatusCode::NOT_FOUND,
                    format!(r#"{{"error":"{e}"}}"#),
                )
            });

        let res = rescue.translate(&Failure::domain(PetNotFound(7)));
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body_string().unwrap(), r#"{"error":"pet 7 not found"}"#);
    }

    #[test]
    fn test_builtin_extraction_translation() {
        let rescue = Rescue::new();
        let res = rescue.translate(
            &ExtractError::ParamMissing {
                param: "status".to_string(),
            }
            .into(),
        );
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unclassified_maps_to_generic_500() {
        let rescue = Rescue::new();
        let res = rescue.translate(&Failure::domain(Duplicate));
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        // the internal representation never reaches the client
        assert_eq!(res.body_string().unwrap(), r#"{"error":"internal"}"#);
    }
}
