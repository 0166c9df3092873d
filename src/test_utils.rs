//! Shared test utilities for the points ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test participants and booths with sensible defaults.

use crate::{
    core::{booth, participant, session::SessionIssuer},
    entities,
    errors::{Error, Result},
};
use sea_orm::{ConnectOptions, DatabaseConnection, EntityTrait};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;

/// Phone number used by single-participant scenarios
pub const TEST_PHONE: &str = "13800000000";
/// Booth id used by single-booth scenarios
pub const TEST_BOOTH: &str = "A1";
/// Signing secret used by test session issuers
pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret";

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is capped at one connection: every `SQLite` in-memory connection is a
/// separate database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database in `dir` served by a pool of several
/// connections, holding [`TEST_PHONE`] with `balance` points and [`TEST_BOOTH`].
///
/// Unlike [`setup_test_db`], spawned tasks sharing this pool run their storage
/// transactions on separate connections.
pub async fn setup_pooled_test_db(
    dir: &TempDir,
    balance: i64,
) -> Result<Arc<DatabaseConnection>> {
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("ledger.sqlite").display()
    );
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(8)
        .min_connections(8)
        .sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    create_test_participant(&db, TEST_PHONE, balance).await?;
    create_test_booth(&db, TEST_BOOTH, "Coffee Corner").await?;
    Ok(Arc::new(db))
}

/// Session issuer with a fixed secret and a one hour lifetime.
#[must_use]
pub fn test_issuer() -> SessionIssuer {
    SessionIssuer::new(
        &SecretString::from(TEST_SECRET.to_string()),
        Duration::from_secs(3600),
    )
}

/// Creates an un-activated participant with the given balance.
pub async fn create_test_participant(
    db: &DatabaseConnection,
    phone: &str,
    balance: i64,
) -> Result<entities::participant::Model> {
    participant::provision_participant(db, phone, balance).await?;
    participant::get_participant_by_phone(db, phone)
        .await?
        .ok_or_else(|| Error::ParticipantNotFound {
            phone: phone.to_string(),
        })
}

/// Creates a booth with a zero balance.
pub async fn create_test_booth(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
) -> Result<entities::booth::Model> {
    booth::provision_booth(db, id, name).await?;
    booth::get_booth_by_id(db, id)
        .await?
        .ok_or_else(|| Error::BoothNotFound {
            booth_id: id.to_string(),
        })
}

/// Sets up a database holding [`TEST_PHONE`] with `balance` points and an empty
/// [`TEST_BOOTH`] named "Coffee Corner".
pub async fn setup_with_participant_and_booth(balance: i64) -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    create_test_participant(&db, TEST_PHONE, balance).await?;
    create_test_booth(&db, TEST_BOOTH, "Coffee Corner").await?;
    Ok(db)
}

/// Reads a participant's stored balance directly from the table.
pub async fn participant_balance(db: &DatabaseConnection, phone: &str) -> Result<i64> {
    entities::Participant::find_by_id(phone.to_owned())
        .one(db)
        .await?
        .map(|p| p.balance)
        .ok_or_else(|| Error::ParticipantNotFound {
            phone: phone.to_string(),
        })
}

/// Reads a booth's stored balance directly from the table.
pub async fn booth_balance(db: &DatabaseConnection, id: &str) -> Result<i64> {
    entities::Booth::find_by_id(id.to_owned())
        .one(db)
        .await?
        .map(|b| b.balance)
        .ok_or_else(|| Error::BoothNotFound {
            booth_id: id.to_string(),
        })
}
