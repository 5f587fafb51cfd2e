//! Verification of access tokens minted by the identity service.
//!
//! The chat hub issues no tokens of its own. Clients present an HS256 JWT
//! obtained at sign-in, either as an `Authorization: Bearer` header on REST
//! calls or as a `token` query parameter on the WebSocket upgrade. A token
//! is accepted when its signature verifies against the shared secret, it
//! has not expired, its `type` claim is `access`, and it names a non-empty
//! subject.

use claims::AccessClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::*;

pub(crate) mod claims;

/// The `type` claim value of tokens that grant access to the chat hub.
const ACCESS_TOKEN_TYPE: &str = "access";

/// Verifies one access token and returns the user id it names.
pub(crate) fn verify_access_token(token: &str, secret: &str) -> Option<String> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = match decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(token_data) => token_data,
        Err(e) => {
            debug!("Rejected access token: {e}");
            return None;
        }
    };

    let claims = token_data.claims;
    if claims.token_type != ACCESS_TOKEN_TYPE {
        debug!("Rejected token of type {:?}", claims.token_type);
        return None;
    }
    if claims.sub.is_empty() {
        debug!("Rejected access token with an empty subject");
        return None;
    }

    Some(claims.sub)
}
