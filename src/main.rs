use innovation_points::{
    api::{self, AppState},
    config::{self, database},
    core::{legacy, user},
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_app_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Open the store, creating tables on first run
    let database_url = database::get_database_url();
    database::ensure_sqlite_dir(&database_url)?;
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the default admin and import legacy records if configured
    if user::seed_default_admin(&db, &app_config.default_admin_password).await? {
        info!("Seeded default admin account");
    }
    if let Some(path) = &app_config.legacy_records_file {
        if path.exists() {
            legacy::import_legacy_file(&db, path, &app_config.departments)
                .await
                .inspect_err(|e| error!("Legacy import failed: {}", e))?;
        } else {
            warn!(path = %path.display(), "Legacy records file not found, skipping import");
        }
    }

    // 6. Serve the API
    let listener = tokio::net::TcpListener::bind(app_config.bind_addr.as_str()).await?;
    info!("Listening on {}", app_config.bind_addr);

    let app = api::create_router(Arc::new(AppState {
        db,
        config: app_config,
    }));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
