use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Extensions, HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

use super::error::AppError;
use crate::domain::authorization::{AuthError, AuthorizationPolicy};
use crate::domain::entities::IdentityClaim;
use crate::infrastructure::auth::TokenCodec;

/// Verified identity bound to a single request
///
/// Stored as a typed request extension by [`auth_middleware`]; handlers take
/// it as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext(pub IdentityClaim);

impl AuthContext {
    /// Bind `claim` to the request
    ///
    /// Binding twice is a wiring bug: the first claim is kept and the second
    /// is dropped after logging.
    pub fn attach(extensions: &mut Extensions, claim: IdentityClaim) {
        let existing = extensions.get::<AuthContext>().copied();

        if let Some(AuthContext(existing)) = existing {
            error!(
                kept = %existing,
                rejected = %claim,
                "Identity already attached to request; ignoring second attach"
            );
        }
        debug_assert!(existing.is_none(), "identity attached twice to one request");

        if existing.is_none() {
            extensions.insert(AuthContext(claim));
        }
    }

    /// Read the claim bound by [`AuthContext::attach`]
    ///
    /// # Errors
    /// `MissingIdentity` if nothing was attached, meaning the route is not
    /// behind the auth middleware.
    pub fn extract(extensions: &Extensions) -> Result<IdentityClaim, AuthError> {
        extensions.get::<AuthContext>().map(|context| context.0).ok_or_else(|| {
            error!("CRITICAL: handler requires an identity but none was attached; check route wiring");
            AuthError::MissingIdentity
        })
    }

    pub fn claim(&self) -> &IdentityClaim {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthContext(AuthContext::extract(&parts.extensions)?))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::NoCredential)
}

/// Authentication middleware that verifies bearer tokens
///
/// Rejected requests never reach the handler.
pub async fn auth_middleware(
    State(codec): State<TokenCodec>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claim = codec.verify(bearer_token(request.headers())?)?;

    debug!(subject_id = %claim.subject_id, is_admin = claim.is_admin, "Authenticated request");

    AuthContext::attach(request.extensions_mut(), claim);
    Ok(next.run(request).await)
}

/// Route layer admitting only admin identities; must sit inside `auth_middleware`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let claim = AuthContext::extract(request.extensions())?;
    AuthorizationPolicy::require_admin(&claim)?;

    Ok(next.run(request).await)
}
