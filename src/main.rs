use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use flashcard_bot::{
    config::Config,
    data::{
        database,
        models::Table,
        repositories::DictionaryRepository,
    },
    features::chat::ChatController,
    handlers, logging, utils,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging("info");

    let config = Config::from_env()?;

    // Database configuration
    let pool = database::create_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        database::create_tables(&mut conn)?;

        // Seed the shared dictionary on first start
        if DictionaryRepository::amount_data(&mut conn, Table::Dictionary)? == 0 {
            let loaded = DictionaryRepository::load_seed_file(&mut conn, &config.seed_file)
                .with_context(|| format!("Failed to seed from {}", config.seed_file.display()))?;
            log::info!("Seeded {} words from {}", loaded, config.seed_file.display());
        }
    }

    // Message templates
    let templates = utils::message_templates().context("Template parsing error")?;

    let controller = Arc::new(ChatController::new(pool.clone(), templates));

    let app = Router::new().nest(
        "/api",
        handlers::api_router(pool, controller, config.debug_routes),
    );

    // Start server
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;

    log::info!("Bot running on http://{}", config.bind_addr);
    if config.debug_routes {
        log::warn!("Debug routes are enabled");
    }

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
