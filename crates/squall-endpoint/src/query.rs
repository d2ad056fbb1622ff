//! Query parameter readers
//!
//! Readers always match structurally: whether a parameter is present is not
//! a routing question. A required reader whose parameter is absent resolves
//! to an extraction failure instead of falling through to a sibling route,
//! which would mask the caller's mistake behind a 404.

use crate::cursor::Cursor;
use crate::endpoint::{Endpoint, Matched};
use crate::error::ExtractError;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Read the first value of a required query parameter
///
/// Absence resolves to [`ExtractError::ParamMissing`].
pub fn required(name: impl Into<String>) -> Required {
    Required {
        name: name.into(),
        rule: None,
    }
}

/// Read the first value of an optional query parameter
pub fn optional(name: impl Into<String>) -> Optional {
    Optional { name: name.into() }
}

/// Read all values of a repeated query parameter, in request order
///
/// At least one value is required; zero values resolves to
/// [`ExtractError::ParamMissing`].
pub fn multi(name: impl Into<String>) -> Multi {
    Multi {
        name: name.into(),
        rule: None,
    }
}

/// See [`required`]
pub struct Required {
    name: String,
    rule: Option<(String, Predicate)>,
}

impl Required {
    /// Attach a named validation rule; a failing value resolves to
    /// [`ExtractError::RuleViolation`] carrying the rule's name
    pub fn validate<F>(mut self, rule: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rule = Some((rule.into(), Arc::new(predicate)));
        self
    }
}

impl Endpoint for Required {
    type Output = String;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<String>> {
        let value = match cursor.request().query_first(&self.name) {
            Some(v) => v.to_string(),
            None => {
                return Some(Matched::failed(
                    cursor.clone(),
                    ExtractError::ParamMissing {
                        param: self.name.clone(),
                    }
                    .into(),
                ));
            }
        };
        if let Some((rule, predicate)) = &self.rule {
            if !predicate(&value) {
                return Some(Matched::failed(
                    cursor.clone(),
                    ExtractError::RuleViolation {
                        param: self.name.clone(),
                        rule: rule.clone(),
                    }
                    .into(),
                ));
            }
        }
        Some(Matched::ready(cursor.clone(), value))
    }
}

/// See [`optional`]
pub struct Optional {
    name: String,
}

impl Endpoint for Optional {
    type Output = Option<String>;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Option<String>>> {
        let value = cursor
            .request()
            .query_first(&self.name)
            .map(|v| v.to_string());
        Some(Matched::ready(cursor.clone(), value))
    }
}

/// See [`multi`]
pub struct Multi {
    name: String,
    rule: Option<(String, Predicate)>,
}

impl Multi {
    /// Attach a named validation rule applied to every value
    pub fn validate<F>(mut self, rule: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rule = Some((rule.into(), Arc::new(predicate)));
        self
    }
}

impl Endpoint for Multi {
    type Output = Vec<String>;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Vec<String>>> {
        let values: Vec<String> = cursor
            .request()
            .query_all(&self.name)
            .map(|v| v.to_string())
            .collect();
        if values.is_empty() {
            return Some(Matched::failed(
                cursor.clone(),
                ExtractError::ParamMissing {
                    param: self.name.clone(),
                }
                .into(),
            ));
        }
        if let Some((rule, predicate)) = &self.rule {
            if values.iter().any(|v| !predicate(v)) {
                return Some(Matched::failed(
                    cursor.clone(),
                    ExtractError::RuleViolation {
                        param: self.name.clone(),
                        rule: rule.clone(),
                    }
                    .into(),
                ));
            }
        }
        Some(Matched::ready(cursor.clone(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::request::{Method, RequestBuilder};

    fn cursor(raw_query: &str) -> Cursor {
        Cursor::new(
            RequestBuilder::new(Method::Get, "/pet/findByStatus")
                .raw_query(raw_query)
                .build(),
        )
    }

    fn extract(matched: Matched<impl Send>) -> ExtractError {
        match futures::executor::block_on(matched.value) {
            Err(Failure::Extract(e)) => e,
            other => panic!("expected extraction failure, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn test_required_present() {
        let matched = required("status").apply(&cursor("status=sold")).unwrap();
        assert_eq!(matched.value.await.unwrap(), "sold");
    }

    #[test]
    fn test_required_absent_is_failure_not_non_match() {
        let matched = required("status").apply(&cursor("limit=5")).unwrap();
        assert_eq!(
            extract(matched),
            ExtractError::ParamMissing {
                param: "status".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_optional_absent_yields_none() {
        let matched = optional("status").apply(&cursor("")).unwrap();
        assert_eq!(matched.value.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multi_request_order() {
        let matched = multi("status")
            .apply(&cursor("status=sold&limit=1&status=pending"))
            .unwrap();
        assert_eq!(matched.value.await.unwrap(), vec!["sold", "pending"]);
    }

    #[test]
    fn test_multi_empty_is_failure() {
        let matched = multi("status").apply(&cursor("limit=5")).unwrap();
        assert_eq!(
            extract(matched),
            ExtractError::ParamMissing {
                param: "status".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rule_name_in_failure() {
        let reader = required("limit").validate("positive_int", |v| {
            v.parse::<u64>().map(|n| n > 0).unwrap_or(false)
        });
        let matched = reader.apply(&cursor("limit=zero")).unwrap();
        assert_eq!(
            extract(matched),
            ExtractError::RuleViolation {
                param: "limit".to_string(),
                rule: "positive_int".to_string()
            }
        );

        let matched = reader.apply(&cursor("limit=3")).unwrap();
        assert_eq!(
            futures::executor::block_on(matched.value).unwrap(),
            "3".to_string()
        );
    }
}
