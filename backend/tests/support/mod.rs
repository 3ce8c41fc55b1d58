//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the app is assembled here from the public API exactly as the server does,
//! but on in-memory stores and a cheap Argon2 work factor.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use inventory_backend::domain::resources::{Inventory, Item, Order, Product, Shipment, Supplier, Vendor};
use inventory_backend::inbound::http::health::{HealthState, live, ready};
use inventory_backend::inbound::http::router::configure_api;
use inventory_backend::inbound::http::state::{HttpState, HttpStatePorts};
use inventory_backend::middleware::{CatchPanic, Trace};
use inventory_backend::outbound::memory::{InMemoryResourceStore, InMemoryUserRepository};
use inventory_backend::outbound::security::{
    Argon2CredentialHasher, HashingParams, JwtTokenService, SharedClock,
};

pub const SECRET: &str = "integration-test-secret";

pub fn memory_state() -> web::Data<HttpState> {
    let clock: SharedClock = Arc::new(DefaultClock);
    let hasher = Argon2CredentialHasher::new(HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid argon2 params");
    let tokens = JwtTokenService::new(&Zeroizing::new(SECRET.to_owned()), Arc::clone(&clock))
        .expect("token service");
    web::Data::new(HttpState::new(HttpStatePorts {
        users: Arc::new(InMemoryUserRepository::new(Arc::clone(&clock))),
        hasher: Arc::new(hasher),
        tokens: Arc::new(tokens),
        inventory: Arc::new(InMemoryResourceStore::<Inventory>::new(Arc::clone(&clock))),
        items: Arc::new(InMemoryResourceStore::<Item>::new(Arc::clone(&clock))),
        products: Arc::new(InMemoryResourceStore::<Product>::new(Arc::clone(&clock))),
        orders: Arc::new(InMemoryResourceStore::<Order>::new(Arc::clone(&clock))),
        shipments: Arc::new(InMemoryResourceStore::<Shipment>::new(Arc::clone(&clock))),
        suppliers: Arc::new(InMemoryResourceStore::<Supplier>::new(Arc::clone(&clock))),
        vendors: Arc::new(InMemoryResourceStore::<Vendor>::new(clock)),
    }))
}

/// The production middleware stack over the full API, plus any extra routes.
pub async fn init_app(
    extra: impl FnOnce(&mut web::ServiceConfig),
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(
        App::new()
            .app_data(health)
            .service(ready)
            .service(live)
            .configure(extra)
            .configure(configure_api(memory_state()))
            .wrap(CatchPanic)
            .wrap(Trace),
    )
    .await
}

/// Register and log in, returning the bearer token.
pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let credentials = json!({"email": email, "password": password});
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "registration failed: {}", res.status());

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    let body: Value = test::read_body_json(res).await;
    body["token"].as_str().expect("token string").to_owned()
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}
