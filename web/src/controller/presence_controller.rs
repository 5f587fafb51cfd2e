use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::response::presence::PresenceResponse;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use log::*;

/// GET the presence snapshot of one user.
///
/// Presence is in-memory state of this process; a user who has never
/// connected here reads as offline with a zero last-seen.
#[utoipa::path(
    get,
    path = "/chat/presence/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id to look up")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the user's presence", body = PresenceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(_user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET presence for user: {user_id}");

    let presence = app_state.hub.presence(&user_id);

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        PresenceResponse::new(user_id, presence),
    )))
}
