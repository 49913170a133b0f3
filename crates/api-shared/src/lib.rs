//! # API Shared
//!
//! Shared definitions for the triage APIs.
//!
//! Contains:
//! - Request/response types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Bearer-token sessions (`auth` module)
//!
//! Used by `api-rest` and the server binary.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{bearer_token, SessionStore};
pub use dto::*;
pub use health::HealthService;
