//! farm_market server
//!
//! ```text
//! farm_market [--env dev|prod] [--port 8080]
//! ```

use anyhow::Context;
use std::sync::Arc;

use farm_market::account::PgAccountStore;
use farm_market::catalog::PgCatalogStore;
use farm_market::config::AppConfig;
use farm_market::db::Database;
use farm_market::gateway::state::{AppState, ImageDirs};
use farm_market::order::PgOrderStore;
use farm_market::proximity::PgFarmLocator;
use farm_market::storage::GithubImageStore;
use farm_market::user_auth::TokenService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env).context("Failed to load configuration")?;
    let _log_guard = farm_market::logging::init_logging(&app_config);

    tracing::info!(
        "Starting farm_market {} ({}) in {} mode",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env
    );

    let db = Database::connect(app_config.postgres_url()?, &app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    if app_config.database.run_migrations {
        db.migrate().await.context("Failed to apply migrations")?;
    } else {
        tracing::info!("Skipping migrations (database.run_migrations = false)");
    }
    let db = Arc::new(db);
    let pool = db.pool().clone();

    let tokens = Arc::new(TokenService::new(app_config.jwt_secret()?));

    if app_config.image_store.access_token.is_none() {
        tracing::warn!("GH_ACCESS_TOKEN not set; image uploads will fail");
    }
    let images = GithubImageStore::new(app_config.image_store.clone())
        .context("Failed to build image store client")?;

    let state = AppState::new(
        Arc::new(PgAccountStore::new(pool.clone())),
        Arc::new(PgCatalogStore::new(pool.clone())),
        Arc::new(PgOrderStore::new(pool.clone())),
        Arc::new(PgFarmLocator::new(pool)),
        Arc::new(images),
        tokens,
    )
    .with_database(db)
    .with_image_dirs(ImageDirs {
        products: app_config.image_store.product_dir.clone(),
        farms: app_config.image_store.farm_dir.clone(),
    });

    let gateway = &app_config.gateway;
    let port = get_port_override().unwrap_or(gateway.port);

    farm_market::run_server(&gateway.host, port, Arc::new(state), gateway.max_body_bytes)
        .await
        .context("Server error")?;
    Ok(())
}
