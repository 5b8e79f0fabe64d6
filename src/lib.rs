#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

//! Movie Catalog Service
//!
//! Rating backend for a movie catalog: bearer-token authentication, per-user
//! movie ratings and per-movie rating aggregates kept consistent under
//! concurrent writes.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub mod test_utils;

pub use application::dto::*;
pub use domain::entities::*;
