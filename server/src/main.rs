//! Servidor HTTP del punto de venta

mod api;
mod auth;
mod domain;
mod infrastructure;

use std::sync::Arc;

use pos_adapter_postgres::{MigrationManager, PostgresConfig, TransactionManager};
use pos_config::AppConfig;
use pos_telemetry::{init_tracing, init_tracing_json};
use secrecy::ExposeSecret;
use tracing::info;

use crate::api::AppState;
use crate::auth::Authenticator;
use crate::infrastructure::persistence::{
    PostgresProductoRepository, PostgresVentaRepository, schema,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;

    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    info!(app = %config.app_name, env = %config.app_env, "Iniciando servidor");

    let pg_config = PostgresConfig::new(config.database.url.expose_secret())
        .with_max_connections(config.database.max_connections);
    let pool = pos_adapter_postgres::create_pool(&pg_config).await?;
    pos_adapter_postgres::check_connection(&pool).await?;

    MigrationManager::new(pool.clone())
        .apply_all(&schema::migraciones())
        .await?;
    info!("Esquema al día");

    let state = AppState {
        productos: Arc::new(PostgresProductoRepository::new(pool.clone())),
        ventas: Arc::new(PostgresVentaRepository::new(TransactionManager::new(pool))),
    };
    let auth = Arc::new(Authenticator::from_config(&config.auth)?);

    let app = api::app(state, auth);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Escuchando");

    axum::serve(listener, app).await?;

    Ok(())
}
