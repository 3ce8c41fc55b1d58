//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local stores used without a database
//! - **security**: Argon2id credential hashing and HS256 identity tokens
//!
//! Adapters are thin translators between domain types and their
//! infrastructure representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
