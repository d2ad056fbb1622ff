//! The endpoint compiler
//!
//! [`compile`] folds a composed endpoint tree plus an error table into a
//! single async request-to-response function. Per request the dispatch walks
//! a fixed state machine: pure synchronous matching, then at most one async
//! resolution, then encoding or error translation. Exactly one terminal is
//! reached; siblings are never retried after the matched branch fails.

use crate::outcome::{encode, IntoOutcome};
use crate::rescue::Rescue;
use crate::response::Response;
use futures::future::BoxFuture;
use squall_endpoint::{Cursor, Endpoint, Request};
use std::sync::Arc;

type ServiceFn = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A compiled request-to-response function
///
/// Cheap to clone; the underlying tree and table are shared, read-only,
/// across all concurrent invocations.
#[derive(Clone)]
pub struct Service {
    inner: Arc<ServiceFn>,
}

impl Service {
    /// Build a service from a raw async function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Request) -> BoxFuture<'static, Response> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Dispatch one request
    pub async fn call(&self, request: Request) -> Response {
        (self.inner)(request).await
    }
}

/// Compile an endpoint tree and an error table into a [`Service`]
///
/// - no structural match, or trailing unconsumed segments, yields the fixed
///   not-found response without consulting the table
/// - a resolved value is encoded through its semantic outcome
/// - a failure is translated by the table, in registration order
pub fn compile<E>(endpoint: E, rescue: Rescue) -> Service
where
    E: Endpoint + 'static,
    E::Output: IntoOutcome,
{
    let endpoint = Arc::new(endpoint);
    let rescue = Arc::new(rescue);
    Service::from_fn(move |request: Request| -> BoxFuture<'static, Response> {
        let method = request.method;
        let path = request.path.clone();
        let cursor = Cursor::new(request);

        let matched = match endpoint.apply(&cursor) {
            Some(matched) if matched.cursor.at_end() => matched,
            Some(_) => {
                // a partial match with trailing segments is not a match
                tracing::debug!(%method, %path, "no match (trailing segments)");
                return Box::pin(futures::future::ready(Response::not_found()));
            }
            None => {
                tracing::debug!(%method, %path, "no match");
                return Box::pin(futures::future::ready(Response::not_found()));
            }
        };

        let rescue = Arc::clone(&rescue);
        Box::pin(async move {
            match matched.value.await {
                Ok(value) => encode(value.into_outcome()),
                Err(failure) => {
                    tracing::debug!(%method, %path, error = %failure, "endpoint failed");
                    rescue.translate(&failure)
                }
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::response::StatusCode;
    use squall_endpoint::method::get;
    use squall_endpoint::path::{capture, literal};
    use squall_endpoint::{EndpointExt, Method};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ping() -> impl Endpoint<Output = Outcome> {
        get()
            .right(literal("ping"))
            .map(|_| Outcome::Ok(bytes::Bytes::from_static(b"\"pong\"")))
    }

    #[tokio::test]
    async fn test_success_is_encoded() {
        let service = compile(ping(), Rescue::new());
        let res = service.call(Request::new(Method::Get, "/ping")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body_string().unwrap(), "\"pong\"");
    }

    #[tokio::test]
    async fn test_unmatched_is_fixed_not_found() {
        let service = compile(ping(), Rescue::new());

        let res = service.call(Request::new(Method::Post, "/ping")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = service.call(Request::new(Method::Get, "/pong")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trailing_segments_are_not_a_match() {
        let service = compile(ping(), Rescue::new());
        let res = service.call(Request::new(Method::Get, "/ping/extra")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_matching_attempted_once_per_request() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let ep = get().right(capture::<u64>()).and_then(|id| async move {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::not_found(format!("pet {id} missing")))
        });
        let service = compile(ep, Rescue::new());

        let res = service.call(Request::new(Method::Get, "/7")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_shares_the_tree() {
        let service = compile(ping(), Rescue::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service.call(Request::new(Method::Get, "/ping")).await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().status, StatusCode::OK);
        }
    }
}
