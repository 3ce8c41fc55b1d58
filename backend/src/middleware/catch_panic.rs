//! Converts a panicking handler into a 500 response.
//!
//! Actix would otherwise drop the connection without a reply. The panic is
//! surfaced as an internal [`Error`], which actix renders through
//! `ResponseError`. Wrap this inside [`crate::middleware::Trace`] so the
//! error captures the request's trace identifier.
//!
//! The request is moved into the inner service untouched: the router needs
//! sole ownership of the `HttpRequest` to record path parameters.

use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error;

/// Middleware factory for panic recovery.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service wrapper produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        let call = std::panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));
        Box::pin(async move {
            let outcome = match call {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            outcome.unwrap_or_else(|payload| {
                error!(
                    path = %path,
                    panic = panic_message(payload.as_ref()),
                    "request handler panicked"
                );
                Err(Error::internal("Internal server error").into())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, ResponseError, test as actix_test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, TRACE_ID_HEADER};
    use crate::middleware::Trace;

    async fn explode() -> HttpResponse {
        panic!("handler blew up");
    }

    async fn echo_id(path: web::Path<i64>) -> HttpResponse {
        HttpResponse::Ok().body(path.into_inner().to_string())
    }

    #[rstest]
    fn panic_message_reads_common_payloads() {
        let literal: Box<dyn std::any::Any + Send> = Box::new("static message");
        assert_eq!(panic_message(literal.as_ref()), "static message");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let opaque: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(opaque.as_ref()), "non-string panic payload");
    }

    #[rstest]
    #[actix_web::test]
    async fn routing_with_path_parameters_is_untouched() {
        let app = actix_test::init_service(
            App::new()
                .wrap(CatchPanic)
                .wrap(Trace)
                .route("/items/{id}", web::get().to(echo_id)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/items/42").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "42");
    }

    #[rstest]
    #[actix_web::test]
    async fn panicking_handler_returns_500_and_service_keeps_running() {
        let app = actix_test::init_service(
            App::new()
                .wrap(CatchPanic)
                .wrap(Trace)
                .route("/boom", web::get().to(explode))
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let err = actix_test::try_call_service(
            &app,
            actix_test::TestRequest::get().uri("/boom").to_request(),
        )
        .await
        .err()
        .expect("panic surfaces as an error");
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace id header");
        let bytes = actix_web::body::to_bytes(res.into_body())
            .await
            .expect("error body");
        let body: Error = serde_json::from_slice(&bytes).expect("error json");
        assert_eq!(body.code(), ErrorCode::InternalError);
        assert_eq!(body.message(), "Internal server error");
        assert_eq!(body.trace_id(), Some(header.as_str()));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/ok").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
