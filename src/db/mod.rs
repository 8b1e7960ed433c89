pub mod entities;
pub mod repositories;

pub use entities::*;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

/// Open the connection pool described by `config`.
///
/// The pool is the only shared store handle in the process; it is passed
/// explicitly through `AppState` and every query acquires a connection from
/// it for the duration of that query or transaction.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let timeout = Duration::from_secs(config.database_connect_timeout_secs);

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.database_max_connections)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}
