//! Fleettrack - A lightweight fleet and cargo tracking backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleettrack::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxUserRepository, SqlxVehicleRepository},
    },
    services::{TokenService, UserService, VehicleService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleettrack=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fleettrack backend...");

    // Load configuration (file + environment overrides)
    let config = Config::load_with_env(Path::new("config.yml"))?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories and services
    let token_service = TokenService::from_config(&config.auth);
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let vehicle_repo = SqlxVehicleRepository::boxed(pool.clone());

    let user_service = Arc::new(UserService::new(user_repo, token_service.clone()));
    let vehicle_service = Arc::new(VehicleService::new(vehicle_repo));

    // Build application state
    let state = AppState {
        user_service,
        vehicle_service,
        token_service,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
