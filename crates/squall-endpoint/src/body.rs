//! Request body extractors
//!
//! - [`json`] — decode the body into a `serde` target type
//! - [`file`] — pull one field's raw bytes out of a multipart/form-data body
//!
//! Presence is a structural question only when the endpoint opts into it; by
//! default an absent body is an extraction failure, because a malformed or
//! missing body must not fall through to an unrelated sibling route. The
//! actual decode runs in the async step, after branch selection is final.

use crate::cursor::Cursor;
use crate::endpoint::{Endpoint, Matched};
use crate::error::ExtractError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Decode the request body as JSON into `T`
///
/// Malformed JSON resolves to [`ExtractError::BodyNotParsed`]. An absent
/// body resolves to [`ExtractError::BodyNotPresent`] unless
/// [`JsonBody::allow_missing_fallthrough`] was called.
pub fn json<T>() -> JsonBody<T>
where
    T: DeserializeOwned + Send + 'static,
{
    JsonBody {
        missing_is_non_match: false,
        _marker: PhantomData,
    }
}

/// Read the raw bytes of a multipart/form-data field
///
/// Structurally matches any request whose content type is multipart with a
/// boundary; an absent field resolves to [`ExtractError::FileMissing`].
pub fn file(field: impl Into<String>) -> FileField {
    FileField {
        field: field.into(),
    }
}

/// See [`json`]
pub struct JsonBody<T> {
    missing_is_non_match: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonBody<T> {
    /// Treat an absent body as a structural non-match instead of a failure,
    /// letting alternation try another branch
    pub fn allow_missing_fallthrough(mut self) -> Self {
        self.missing_is_non_match = true;
        self
    }
}

impl<T> Endpoint for JsonBody<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<T>> {
        if cursor.request().body.is_empty() {
            if self.missing_is_non_match {
                return None;
            }
            return Some(Matched::failed(
                cursor.clone(),
                ExtractError::BodyNotPresent.into(),
            ));
        }
        let request = cursor.request_arc();
        Some(Matched {
            cursor: cursor.clone(),
            value: Box::pin(async move {
                serde_json::from_slice::<T>(&request.body).map_err(|e| {
                    tracing::debug!(error = %e, "body decode failed");
                    ExtractError::BodyNotParsed {
                        detail: e.to_string(),
                    }
                    .into()
                })
            }),
        })
    }
}

/// See [`file`]
pub struct FileField {
    field: String,
}

impl Endpoint for FileField {
    type Output = Bytes;

    fn apply(&self, cursor: &Cursor) -> Option<Matched<Bytes>> {
        let boundary = multipart_boundary(cursor.request().content_type()?)?.to_string();
        let request = cursor.request_arc();
        let field = self.field.clone();
        Some(Matched {
            cursor: cursor.clone(),
            value: Box::pin(async move {
                find_field(&request.body, &boundary, &field)
                    .ok_or_else(|| ExtractError::FileMissing { field }.into())
            }),
        })
    }
}

/// Extract the boundary parameter from a multipart/form-data content type
fn multipart_boundary(content_type: &str) -> Option<&str> {
    let rest = content_type
        .strip_prefix("multipart/form-data")
        .filter(|r| r.is_empty() || r.starts_with(';'))?;
    rest.split(';').find_map(|param| {
        let (name, value) = param.trim().split_once('=')?;
        if name.eq_ignore_ascii_case("boundary") {
            Some(value.trim_matches('"'))
        } else {
            None
        }
    })
}

/// Scan a multipart body for the named field and return its raw content
///
/// Minimal splitter: delimiters per RFC 2046, headers separated from content
/// by a blank line, content ends at the next delimiter.
fn find_field(body: &Bytes, boundary: &str, field: &str) -> Option<Bytes> {
    let delimiter = format!("--{boundary}");
    let text = body.as_ref();
    let mut parts = split_bytes(text, delimiter.as_bytes());
    // everything before the first delimiter is a preamble
    parts.next();
    for part in parts {
        // a trailing "--" marks the closing delimiter
        if part.starts_with(b"--") {
            break;
        }
        let part = strip_crlf(part);
        let header_end = find_subslice(part, b"\r\n\r\n")?;
        let headers = &part[..header_end];
        let content = strip_crlf(&part[header_end + 4..]);
        if part_field_name(headers) == Some(field) {
            let start = content.as_ptr() as usize - text.as_ptr() as usize;
            return Some(body.slice(start..start + content.len()));
        }
    }
    None
}

/// The `name` parameter of the part's Content-Disposition header
fn part_field_name(headers: &[u8]) -> Option<&str> {
    let headers = std::str::from_utf8(headers).ok()?;
    headers.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("content-disposition") {
            return None;
        }
        value.split(';').find_map(|param| {
            let (k, v) = param.trim().split_once('=')?;
            if k == "name" {
                Some(v.trim_matches('"'))
            } else {
                None
            }
        })
    })
}

fn strip_crlf(mut bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_prefix(b"\r\n") {
        bytes = rest;
    }
    if let Some(rest) = bytes.strip_suffix(b"\r\n") {
        bytes = rest;
    }
    bytes
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_bytes<'a>(haystack: &'a [u8], delimiter: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
    let mut rest = Some(haystack);
    std::iter::from_fn(move || {
        let slice = rest?;
        match find_subslice(slice, delimiter) {
            Some(at) => {
                rest = Some(&slice[at + delimiter.len()..]);
                Some(&slice[..at])
            }
            None => {
                rest = None;
                Some(slice)
            }
        }
    })
}
