//! In-process adapters backing the ports when no database URL is configured.
//!
//! State lives for the lifetime of the process. Integration tests build the
//! HTTP app on top of these.

mod resources;
mod users;

pub use resources::InMemoryResourceStore;
pub use users::InMemoryUserRepository;
