//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod identity;
pub mod profile;
pub mod resources;
pub mod router;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod user_dto;
pub mod users;
