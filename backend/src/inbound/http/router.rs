//! Route table for the REST API.
//!
//! `/api/auth/*` is public; everything else under `/api` sits behind
//! [`BearerAuth`]. Extractor failures are mapped to `400 Invalid input`
//! through the configs registered here.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::TokenService;
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, profile, resources, users};
use crate::middleware::BearerAuth;

/// JSON body config whose failures answer `400 Invalid input`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query string config whose failures answer `400 Invalid input`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Path segment config whose failures answer `400 Invalid input`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

fn protected(tokens: Arc<dyn TokenService>) -> impl actix_web::dev::HttpServiceFactory {
    web::scope("")
        .wrap(BearerAuth::new(tokens))
        .configure(profile::configure)
        .configure(users::configure)
        .configure(resources::configure)
}

/// Mount the API and its shared state.
///
/// # Examples
/// ```no_run
/// # use actix_web::{App, web};
/// # fn build(state: web::Data<inventory_backend::inbound::http::state::HttpState>) {
/// use inventory_backend::inbound::http::router::configure_api;
///
/// let app = App::new().configure(configure_api(state));
/// # }
/// ```
pub fn configure_api(state: web::Data<HttpState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let tokens = Arc::clone(&state.tokens);
        cfg.app_data(state)
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .service(auth::register)
                            .service(auth::login),
                    )
                    .service(protected(tokens)),
            );
    }
}
