//! Bearer-token identity middleware for the protected API scope.
//!
//! Each request is checked once: header present, `Bearer ` scheme, token
//! verified. Success stores an [`AuthenticatedUser`] in the request
//! extensions; any failure short-circuits with a 401 JSON error and the
//! wrapped service never runs.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AuthenticatedUser, Error};

/// 401 message when the `Authorization` header is absent or empty.
pub const MISSING_HEADER_MESSAGE: &str = "Authorization header is required";
/// 401 message when the header does not use the `Bearer ` scheme.
pub const NOT_BEARER_MESSAGE: &str = "Authorization token must be a Bearer token";
const BEARER_PREFIX: &str = "Bearer ";

/// Why a request failed authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rejection {
    MissingHeader,
    NotBearer,
    InvalidToken(TokenError),
}

impl Rejection {
    fn into_error(self) -> Error {
        match self {
            Self::MissingHeader => Error::unauthorized(MISSING_HEADER_MESSAGE),
            Self::NotBearer => Error::unauthorized(NOT_BEARER_MESSAGE),
            Self::InvalidToken(err) => Error::unauthorized(format!("Invalid token: {err}")),
        }
    }
}

/// Run the header checks and verify the token.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    tokens: &dyn TokenService,
) -> Result<AuthenticatedUser, Rejection> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(Rejection::MissingHeader);
    };
    if value.is_empty() {
        return Err(Rejection::MissingHeader);
    }
    let token = value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix(BEARER_PREFIX))
        .ok_or(Rejection::NotBearer)?;
    tokens
        .verify(token)
        .map(AuthenticatedUser::from)
        .map_err(Rejection::InvalidToken)
}

/// Middleware factory guarding a scope with bearer tokens.
///
/// # Examples
/// ```ignore
/// let scope = web::scope("/api").wrap(BearerAuth::new(tokens));
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    tokens: Arc<dyn TokenService>,
}

impl BearerAuth {
    /// Guard with tokens verified by `tokens`.
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service,
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

/// Service wrapper produced by [`BearerAuth`].
pub struct BearerAuthMiddleware<S> {
    service: S,
    tokens: Arc<dyn TokenService>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers(), self.tokens.as_ref()) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => Box::pin(async move {
                // Built inside the future so the error picks up the trace id.
                debug!(?rejection, path = req.path(), "request rejected by bearer auth");
                let response = rejection.into_error().error_response();
                Ok(req.into_response(response).map_into_right_body())
            }),
        }
    }
}
