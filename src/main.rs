use agency_collab_api::{config, database::DatabaseManager, init_tracing, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = config::config();
    tracing::info!("Starting agency collaboration API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("AUTH_JWT_SECRET is not set; every protected request will be rejected");
    }

    match (&config.database.url, config.database.run_migrations) {
        (Some(_), true) => DatabaseManager::migrate().await?,
        (None, _) => tracing::warn!("DATABASE_URL is not set; protected routes will answer 503"),
        _ => {}
    }

    let result = server::serve().await;
    DatabaseManager::close().await;
    result
}
