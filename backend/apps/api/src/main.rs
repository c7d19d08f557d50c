//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use api::{AppParts, Settings, build_app, cors_layer};
use auth::PgAuthRepository;
use growth::{GrowthConfig, PgGrowthRepository};
use platform::upload::UploadStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,growth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let auth_config = settings.auth_config(cfg!(debug_assertions))?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let uploads = UploadStore::new(&settings.upload_dir);
    uploads.ensure_root().await?;

    tracing::info!(
        upload_dir = %settings.upload_dir.display(),
        max_upload_bytes = settings.max_upload_bytes,
        "Upload directory ready"
    );

    // Build router
    let app = build_app(AppParts {
        users: PgAuthRepository::new(pool.clone()),
        growth: PgGrowthRepository::new(pool),
        uploads,
        auth_config,
        growth_config: Arc::new(GrowthConfig::default()),
        max_upload_bytes: settings.max_upload_bytes,
    })
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&settings.frontend_origins));

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
