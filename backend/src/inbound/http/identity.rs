//! Extractor for the caller identity established by [`BearerAuth`].
//!
//! [`BearerAuth`]: crate::middleware::BearerAuth

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{AuthenticatedUser, Error};
use crate::middleware::bearer_auth::MISSING_HEADER_MESSAGE;

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Reads the identity from request extensions. Routes outside the guarded
    /// scope never have one and answer 401.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Self>().cloned();
        ready(identity.ok_or_else(|| Error::unauthorized(MISSING_HEADER_MESSAGE).into()))
    }
}
