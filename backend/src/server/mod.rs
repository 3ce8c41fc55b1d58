//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::body::BoxBody;
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use inventory_backend::doc::ApiDoc;
use inventory_backend::inbound::http::health::{HealthState, live, ready};
use inventory_backend::inbound::http::router::configure_api;
use inventory_backend::inbound::http::state::HttpState;
use inventory_backend::middleware::{CatchPanic, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .service(ready)
        .service(live)
        .configure(configure_api(http_state));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Trace wraps last so a recovered panic is reported inside the trace scope.
    app.wrap(CatchPanic).wrap(Trace)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .shutdown_timeout(config.shutdown_timeout.as_secs())
        .disable_signals()
        .run();

    health_state.mark_ready();
    Ok(server)
}
