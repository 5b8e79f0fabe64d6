use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::dto::TokenResponse,
    domain::{entities::Identity, repositories::CredentialRepository},
    infrastructure::auth::{TokenCodec, verify_password},
    presentation::middleware::error::AppError,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Use case for exchanging a login and password for a bearer token
///
/// The admin flag is copied into the token at issuance; later privilege
/// changes take effect only when a new token is issued.
pub struct LoginUseCase<C>
where
    C: CredentialRepository + ?Sized,
{
    credentials: Arc<C>,
    codec: TokenCodec,
    token_ttl: TimeDelta,
}

impl<C> LoginUseCase<C>
where
    C: CredentialRepository + ?Sized,
{
    pub fn new(credentials: Arc<C>, codec: TokenCodec, token_ttl: TimeDelta) -> Self {
        Self { credentials, codec, token_ttl }
    }

    /// # Errors
    /// * `Authentication` - unknown login or wrong password, indistinguishably
    /// * `Internal` - the stored hash is unreadable or signing failed
    pub async fn execute(&self, username: &str, password: &str) -> Result<TokenResponse, AppError> {
        let Some(stored) = self.credentials.find_by_login(username).await? else {
            warn!("Login attempt for unknown user {}", username);
            return Err(AppError::Authentication { message: INVALID_CREDENTIALS.to_string() });
        };

        if !verify_password(password, &stored.password_hash)? {
            warn!("Wrong password for user {}", username);
            return Err(AppError::Authentication { message: INVALID_CREDENTIALS.to_string() });
        }

        let identity = Identity { subject_id: stored.subject_id, is_admin: stored.is_admin };
        let issued = self.codec.issue(identity, self.token_ttl)?;

        info!("Issued token for user {} (admin: {})", stored.subject_id, stored.is_admin);

        Ok(TokenResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: (issued.claim.expires_at - Utc::now()).num_seconds().max(0),
            expiry: issued.claim.expires_at.to_rfc3339(),
        })
    }
}
