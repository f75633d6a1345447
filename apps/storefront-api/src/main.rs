use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Colored error reports before any fallible operation.
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // Schema and the seeded status registry must be in place before the
    // first request; the order workflow depends on "pending" existing.
    database::postgres::run_migrations::<migration::Migrator>(&db, "storefront_api")
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let jwt = axum_helpers::JwtAuth::new(&config.auth);

    let state = AppState { config, db, jwt };

    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(api_routes);

    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting storefront API");

    create_app(app, &state.config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    // Close the pool once the listener has drained.
    match state.db.close().await {
        Ok(_) => info!("PostgreSQL connection closed"),
        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
    }

    info!("Storefront API shutdown complete");
    Ok(())
}
