//! Middleware for HTTP request processing
//!
//! - Bearer authentication and the admin gate
//! - Structured error rendering
//! - Per-request operation deadline

pub mod auth;
pub mod error;
pub mod timeout;

pub use auth::{AuthContext, auth_middleware, require_admin};
pub use error::{AppError, ErrorResponse};
pub use timeout::deadline_middleware;
