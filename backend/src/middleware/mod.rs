//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit in front of the handlers:
//! trace correlation, panic recovery and bearer-token authentication.

pub mod bearer_auth;
pub mod catch_panic;
pub mod trace;

pub use bearer_auth::BearerAuth;
pub use catch_panic::CatchPanic;
pub use trace::Trace;
