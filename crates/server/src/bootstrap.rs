use axum::{http::StatusCode, middleware, Router};
use clientes_core::config::{AppConfig, ConfigError};
use clientes_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::auth::{self, AuthState};
use crate::customers::{CustomerFacade, CustomerService};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub customers: CustomerFacade,
    pub auth: AuthState,
}

impl Application {
    pub fn router(&self) -> Router {
        api_router(self.customers.clone(), self.auth.clone())
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

/// Customer routes behind Basic auth. Unknown paths are authenticated before the 404.
pub fn api_router(customers: CustomerFacade, auth_state: AuthState) -> Router {
    crate::customers::router(customers)
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn_with_state(auth_state, auth::require_basic_auth))
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let customers = CustomerFacade::new(CustomerService::sqlite(db_pool.clone()));
    let auth = AuthState::from_config(&config.security);

    Ok(Application { config, db_pool, customers, auth })
}
