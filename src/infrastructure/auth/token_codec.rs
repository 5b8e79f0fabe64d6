use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::authorization::AuthError;
use crate::domain::entities::{Identity, IdentityClaim, UserId};

/// Signed claim set as it travels on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    is_admin: bool,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly signed token together with the claim it encodes
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claim: IdentityClaim,
}

#[derive(Error, Debug)]
pub enum TokenIssueError {
    #[error("Token encoding error: {0}")]
    Encoding(String),

    #[error("Token lifetime {ttl} from {issued_at} is outside the representable range")]
    ExpiryOutOfRange { issued_at: DateTime<Utc>, ttl: TimeDelta },
}

/// HS256 codec for identity tokens
///
/// Verification checks integrity before expiry, so a tampered token is
/// reported as malformed even when its `exp` is also in the past. Expiry is
/// exact: a token is rejected from the second its `exp` is reached.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `verify_at` after the signature, with no leeway
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `identity` valid for `ttl` from now
    pub fn issue(&self, identity: Identity, ttl: TimeDelta) -> Result<IssuedToken, TokenIssueError> {
        self.issue_at(identity, ttl, Utc::now())
    }

    /// Sign a token as if the clock read `now`
    ///
    /// `now` is truncated to whole seconds so the returned claim matches what
    /// `verify` reconstructs from the token.
    pub fn issue_at(
        &self,
        identity: Identity,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenIssueError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenIssueError::ExpiryOutOfRange { issued_at, ttl })?;

        let wire = WireClaims {
            sub: identity.subject_id.to_string(),
            is_admin: identity.is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &wire, &self.encoding_key).map_err(
            |e| {
                error!("Failed to encode token: {}", e);
                TokenIssueError::Encoding(e.to_string())
            },
        )?;

        Ok(IssuedToken {
            token,
            claim: IdentityClaim {
                subject_id: identity.subject_id,
                is_admin: identity.is_admin,
                expires_at,
            },
        })
    }

    /// Verify a token against the current clock
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the clock read `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, AuthError> {
        let claim = self.decode_claim(token)?;

        if claim.is_expired_at(now) {
            debug!(subject_id = %claim.subject_id, "Rejected expired token");
            return Err(AuthError::TokenExpired);
        }

        Ok(claim)
    }

    fn decode_claim(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let wire = decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Failed to decode token: {}", e);
                AuthError::MalformedToken
            })?;

        let subject_id = wire.sub.parse::<UserId>().map_err(|_| AuthError::MalformedToken)?;
        let expires_at =
            DateTime::from_timestamp(wire.exp, 0).ok_or(AuthError::MalformedToken)?;

        Ok(IdentityClaim { subject_id, is_admin: wire.is_admin, expires_at })
    }
}
