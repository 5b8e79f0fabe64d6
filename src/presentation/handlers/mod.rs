pub mod auth;
pub mod ratings;

use chrono::TimeDelta;
use std::sync::Arc;

use crate::domain::repositories::{CredentialRepository, RatingRepository};
use crate::infrastructure::auth::TokenCodec;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ratings: Arc<dyn RatingRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
    pub codec: TokenCodec,
    pub token_ttl: TimeDelta,
}
