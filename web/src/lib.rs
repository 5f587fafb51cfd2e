//! HTTP and WebSocket surface of the chat hub.
//!
//! REST endpoints cover history and presence reads plus the HTTP send
//! fallback; the `/ws` endpoint upgrades to the event stream. Both share
//! one [`AppState`] and authenticate with the same bearer tokens.

use axum::http::{header, HeaderValue, Method};
use log::*;
use service::config::Config;
use tower_http::cors::CorsLayer;

pub(crate) mod auth;
pub(crate) mod controller;
mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod response;
pub(crate) mod router;
pub(crate) mod ws;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::error::{Error, Result};
pub use service::AppState;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!(
        "{}:{}",
        app_state.config.interface.as_deref().unwrap_or("127.0.0.1"),
        app_state.config.port
    );
    // Touch the token secret now so a missing one fails startup instead of
    // the first authenticated request
    debug!(
        "Access token verification enabled ({} byte secret)",
        app_state.config.jwt_secret().len()
    );

    let cors = cors_layer(&app_state.config);
    let router = router::define_routes(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    info!("Server starting... listening for connections on http://{server_url}");

    axum::serve(listener, router).await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping invalid allowed origin: {origin}");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
