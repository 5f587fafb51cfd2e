use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::message::SendParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use wire::Event;

use log::*;

/// POST a direct message to another user over HTTP.
///
/// Finds or creates the direct conversation between the caller and the
/// recipient, persists the message, then fans the event out to both users'
/// live connections. Clients without a WebSocket (curl, native apps mid
/// reconnect) send through here and everyone else still hears about it.
#[utoipa::path(
    post,
    path = "/chat/direct/{user_id}/messages",
    params(
        ("user_id" = String, Path, description = "Recipient user id")
    ),
    request_body = SendParams,
    responses(
        (status = 201, description = "Successfully created a new message", body = store::messages::Model),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_direct(
    AuthenticatedUser(sender_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(params): Json<SendParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST direct message from {sender_id} to {user_id}");

    let conversation = app_state
        .conversation_store
        .direct_conversation(&sender_id, &user_id)
        .await?;
    let message = app_state
        .conversation_store
        .create_message(&conversation.id, &sender_id, &params.body)
        .await?;

    let event = Event::Message {
        conversation_id: message.conversation_id.clone(),
        sender_id: message.sender_id.clone(),
        body: message.body.clone(),
        created_at: message.created_at.timestamp(),
    };
    app_state.hub.send_to(&[sender_id, user_id], &event);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), message)),
    ))
}
