use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, response, ws,
    AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::controller::{conversation_controller, message_controller, presence_controller};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here. The
// WebSocket endpoint cannot be described by OpenAPI; its event shapes are
// published through the components instead.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Chat Hub API"
        ),
        paths(
            health_check_controller::health_check,
            conversation_controller::index,
            conversation_controller::messages,
            conversation_controller::mark_read,
            message_controller::send_direct,
            presence_controller::read,
        ),
        components(
            schemas(
                store::conversations::Model,
                store::messages::Model,
                params::message::SendParams,
                response::presence::PresenceResponse,
                wire::Event,
                wire::ErrorCode,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "chat_hub", description = "Real-time direct messaging API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(conversation_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(presence_routes(app_state.clone()))
        .merge(health_routes())
        .merge(ws_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn conversation_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/chat/conversations", get(conversation_controller::index))
        .route(
            "/chat/conversations/:id/messages",
            get(conversation_controller::messages),
        )
        .route(
            "/chat/conversations/:id/read",
            post(conversation_controller::mark_read),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/chat/direct/:user_id/messages",
            post(message_controller::send_direct),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn presence_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/chat/presence/:user_id", get(presence_controller::read))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// The WebSocket endpoint authenticates inside the handler rather than
/// behind the bearer middleware: the token rides in the query string, and a
/// bad one refuses the upgrade with 401.
fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::handler::chat_ws))
        .with_state(app_state)
}
