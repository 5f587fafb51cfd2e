//! Claims carried by identity-service access tokens.
//!
//! Only the claims the chat hub actually checks are modeled here; anything
//! else in the token is ignored during decoding.

use serde::{Deserialize, Serialize};

/// Claim set of an HS256 access token.
///
/// `Serialize` exists for tests that mint their own tokens; the server only
/// ever decodes.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessClaims {
    /// User id the token was issued to.
    pub(crate) sub: String,
    /// Distinguishes access tokens from refresh tokens.
    #[serde(rename = "type")]
    pub(crate) token_type: String,
    /// Expiry as Unix seconds.
    pub(crate) exp: usize,
}
