//! Middleware chain operators
//!
//! Two composition shapes:
//! - [`Filter`] wraps a compiled [`Service`] with a cross-cutting concern
//!   (logging, auth); filters run outside-in in wrap order.
//! - [`Stage`] chains async transforms so one stage's output feeds the
//!   next's input; a failure short-circuits without invoking later stages.

use crate::response::Response;
use crate::service::Service;
use futures::future::BoxFuture;
use squall_endpoint::{Failure, Request};
use std::sync::Arc;

/// A cross-cutting filter around a service
pub trait Filter: Send + Sync + 'static {
    /// Handle the request, delegating to `next` zero or one times
    fn handle(&self, request: Request, next: Service) -> BoxFuture<'static, Response>;
}

impl Service {
    /// Wrap this service with a filter
    ///
    /// The filter decides whether and when the inner service runs, but the
    /// inner dispatch keeps its single-resolution guarantee.
    pub fn wrap<F: Filter>(self, filter: F) -> Service {
        let filter = Arc::new(filter);
        Service::from_fn(move |request| {
            let filter = Arc::clone(&filter);
            let inner = self.clone();
            filter.handle(request, inner)
        })
    }
}

impl<F> Filter for F
where
    F: Fn(Request, Service) -> BoxFuture<'static, Response> + Send + Sync + 'static,
{
    fn handle(&self, request: Request, next: Service) -> BoxFuture<'static, Response> {
        self(request, next)
    }
}

/// Request/response logging filter
#[derive(Default)]
pub struct Trace;

impl Filter for Trace {
    fn handle(&self, request: Request, next: Service) -> BoxFuture<'static, Response> {
        let method = request.method;
        let path = request.path.clone();
        Box::pin(async move {
            let response = next.call(request).await;
            tracing::info!(%method, %path, status = response.status.as_u16(), "handled");
            response
        })
    }
}

type StageFn<A, B> = dyn Fn(A) -> BoxFuture<'static, Result<B, Failure>> + Send + Sync;

/// An async processing stage from `A` to `B`
///
/// Stages compose with [`Stage::chain`]; the composed stage resolves each
/// input exactly once.
pub struct Stage<A, B> {
    inner: Arc<StageFn<A, B>>,
}

impl<A, B> Clone for Stage<A, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, B> Stage<A, B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    /// Build a stage from an async function
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<B, Failure>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |input| Box::pin(f(input))),
        }
    }

    /// Run the stage
    pub async fn run(&self, input: A) -> Result<B, Failure> {
        (self.inner)(input).await
    }

    /// Feed this stage's output into `next`
    ///
    /// A failure here propagates without invoking `next` at all.
    pub fn chain<C>(self, next: Stage<B, C>) -> Stage<A, C>
    where
        C: Send + 'static,
    {
        Stage::from_fn(move |input| {
            let first = self.clone();
            let second = next.clone();
            async move {
                let mid = first.run(input).await?;
                second.run(mid).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::StatusCode;
    use squall_endpoint::{ExtractError, Method};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn flat(status: StatusCode) -> Service {
        Service::from_fn(move |_| -> BoxFuture<'static, Response> {
            Box::pin(futures::future::ready(Response::new(status)))
        })
    }

    #[tokio::test]
    async fn test_filter_can_short_circuit() {
        let service = flat(StatusCode::OK).wrap(
            |request: Request, next: Service| -> BoxFuture<'static, Response> {
                Box::pin(async move {
                    if request.header("authorization").is_none() {
                        return Response::new(StatusCode::UNAUTHORIZED);
                    }
                    next.call(request).await
                })
            },
        );

        let res = service.call(Request::new(Method::Get, "/pet")).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);

        let req = squall_endpoint::RequestBuilder::new(Method::Get, "/pet")
            .header("authorization", "Bearer x")
            .build();
        assert_eq!(service.call(req).await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_filters_run_outside_in() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let record = |tag: &'static str, order: Arc<Mutex<Vec<&'static str>>>| {
            move |request: Request, next: Service| -> BoxFuture<'static, Response> {
                let order = Arc::clone(&order);
                Box::pin(async move {
                    order.lock().unwrap().push(tag);
                    next.call(request).await
                })
            }
        };

        let service = flat(StatusCode::OK)
            .wrap(record("inner", Arc::clone(&order)))
            .wrap(record("outer", Arc::clone(&order)));

        service.call(Request::new(Method::Get, "/")).await;
        assert_eq!(*order.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_stage_chain_feeds_output_forward() {
        let parse = Stage::from_fn(|raw: String| async move {
            raw.parse::<u64>().map_err(|_| {
                ExtractError::RuleViolation {
                    param: "id".to_string(),
                    rule: "integer".to_string(),
                }
                .into()
            })
        });
        let double = Stage::from_fn(|n: u64| async move { Ok(n * 2) });

        let pipeline = parse.chain(double);
        assert_eq!(pipeline.run("21".to_string()).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_stage_failure_skips_second_stage() {
        static SECOND: AtomicUsize = AtomicUsize::new(0);

        let failing = Stage::from_fn(|_: ()| async {
            Err::<u64, _>(ExtractError::BodyNotPresent.into())
        });
        let counting = Stage::from_fn(|n: u64| async move {
            SECOND.fetch_add(1, Ordering::SeqCst);
            Ok(n)
        });

        let pipeline = failing.chain(counting);
        assert!(pipeline.run(()).await.is_err());
        assert_eq!(SECOND.load(Ordering::SeqCst), 0);
    }
}
