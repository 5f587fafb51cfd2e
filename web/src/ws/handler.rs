use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::auth;
use crate::ws::session;
use service::AppState;

use log::*;

/// Query parameters of the WebSocket endpoint. Browsers cannot attach an
/// Authorization header to an upgrade request, so the token rides in the
/// query string instead.
#[derive(Debug, Deserialize)]
pub(crate) struct UpgradeQuery {
    token: Option<String>,
}

/// GET upgrade to the chat event stream.
///
/// The token is verified before the handshake completes; a missing or
/// invalid one refuses the upgrade with 401 rather than accepting the
/// socket and closing it.
pub async fn chat_ws(
    State(app_state): State<AppState>,
    Query(query): Query<UpgradeQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = query.token.unwrap_or_default();
    let user_id = match auth::verify_access_token(&token, app_state.config.jwt_secret()) {
        Some(user_id) => user_id,
        None => {
            debug!("Refusing WebSocket upgrade without a valid token");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };

    ws.max_message_size(app_state.config.ws_max_message_bytes)
        .on_upgrade(move |socket| session::run(socket, app_state, user_id))
}
