use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::conversation::ListParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use log::*;

/// Default page size for conversation listings.
const DEFAULT_CONVERSATION_PAGE: u64 = 20;
/// Default page size for message history reads.
const DEFAULT_MESSAGE_PAGE: u64 = 50;

/// GET the caller's conversations, most recently active first.
#[utoipa::path(
    get,
    path = "/chat/conversations",
    params(ListParams),
    responses(
        (status = 200, description = "Successfully retrieved the caller's conversations", body = [store::conversations::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET conversations for user: {user_id}");

    let conversations = app_state
        .conversation_store
        .list_conversations(
            &user_id,
            params.limit.unwrap_or(DEFAULT_CONVERSATION_PAGE),
            params.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), conversations)))
}

/// GET one page of a conversation's messages.
#[utoipa::path(
    get,
    path = "/chat/conversations/{id}/messages",
    params(
        ("id" = String, Path, description = "Conversation id to read messages from"),
        ListParams
    ),
    responses(
        (status = 200, description = "Successfully retrieved one page of messages in chronological order", body = [store::messages::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn messages(
    AuthenticatedUser(_user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET messages for conversation: {id}");

    // The store pages newest first so `limit` always grabs the most recent
    // messages; clients want them oldest first
    let mut messages = app_state
        .conversation_store
        .list_messages(
            &id,
            params.limit.unwrap_or(DEFAULT_MESSAGE_PAGE),
            params.offset.unwrap_or(0),
        )
        .await?;
    messages.reverse();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), messages)))
}

/// POST moves the caller's read marker in a conversation to now.
#[utoipa::path(
    post,
    path = "/chat/conversations/{id}/read",
    params(
        ("id" = String, Path, description = "Conversation id to mark read")
    ),
    responses(
        (status = 204, description = "Successfully marked the conversation read"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_read(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST mark conversation {id} read for user: {user_id}");

    app_state
        .conversation_store
        .update_last_read(&id, &user_id, Utc::now())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
