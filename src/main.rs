use hub::Hub;
use log::error;
use migration::MigratorTrait;
use service::{config::Config, logging::Logger};
use std::sync::Arc;
use store::SeaOrmStore;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    let db = match service::init_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration::Migrator::up(&db, None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let hub = Arc::new(Hub::new(config.hub_config()));
    let conversation_store = Arc::new(SeaOrmStore::new(Arc::new(db)));

    let app_state = service::AppState::new(config, hub, conversation_store);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed to start: {e}");
        std::process::exit(1);
    }
}
