//! Database configuration module for the points ledger.
//!
//! This module handles the record store connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity` so the schema always
//! matches the entity definitions without hand-written SQL.

use crate::config::settings::AppConfig;
use crate::entities::{Booth, Participant, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Establishes a connection to the record store described by `config`.
///
/// Connect and acquire timeouts are bounded by `DB_TIMEOUT_SECS` so a stalled
/// store surfaces as an upstream error instead of hanging a request.
#[instrument(skip(config))]
pub async fn create_connection(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url().to_owned());
    options
        .connect_timeout(config.db_timeout)
        .acquire_timeout(config.db_timeout)
        .sqlx_logging(false);

    debug!("Connecting to record store");
    let db = Database::connect(options).await?;
    info!("Record store connection established");
    Ok(db)
}

/// Creates the participants, booths and transactions tables if they do not exist.
///
/// Booths are created before transactions because transactions reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut participant_table = schema.create_table_from_entity(Participant);
    let mut booth_table = schema.create_table_from_entity(Booth);
    let mut transaction_table = schema.create_table_from_entity(Transaction);

    participant_table.if_not_exists();
    booth_table.if_not_exists();
    transaction_table.if_not_exists();

    db.execute(builder.build(&participant_table)).await?;
    db.execute(builder.build(&booth_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}
