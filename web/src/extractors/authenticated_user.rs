use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use hub::UserId;

/// Verified user id placed into the request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUserId(pub UserId);

pub(crate) struct AuthenticatedUser(pub UserId);

// This extractor reads the user id the require_auth middleware verified and
// stashed in the request extensions. Handlers using it must sit behind that
// middleware; a route wired up without it reads as Unauthorized.
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedUserId>() {
            Some(AuthenticatedUserId(user_id)) => Ok(AuthenticatedUser(user_id.clone())),
            None => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        }
    }
}
