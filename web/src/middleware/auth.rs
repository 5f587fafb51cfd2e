use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth;
use crate::extractors::authenticated_user::AuthenticatedUserId;
use service::AppState;

/// Authentication middleware that returns 401 Unauthorized for requests
/// without a valid bearer token.
///
/// On success the verified user id lands in the request extensions, where
/// the `AuthenticatedUser` extractor picks it up. For API endpoints we
/// return proper HTTP status codes instead of redirects.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) => token,
        None => return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    };

    match auth::verify_access_token(token, app_state.config.jwt_secret()) {
        Some(user_id) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUserId(user_id));
            next.run(request).await
        }
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}
