//! Booth business logic - listing, lookup and provisioning.

use crate::{
    entities::{Booth, booth},
    errors::{Error, Result},
};
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;

/// Public view of a booth; the balance is withheld from participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct BoothSummary {
    /// Booth identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// Lists every booth's id and name, ordered by id ascending.
pub async fn list_booths(db: &DatabaseConnection) -> Result<Vec<BoothSummary>> {
    Booth::find()
        .select_only()
        .column(booth::Column::Id)
        .column(booth::Column::Name)
        .order_by_asc(booth::Column::Id)
        .into_model::<BoothSummary>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a booth by its identifier.
pub async fn get_booth_by_id<C>(db: &C, booth_id: &str) -> Result<Option<booth::Model>>
where
    C: ConnectionTrait,
{
    Booth::find_by_id(booth_id.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a booth with a zero balance unless one already exists for `id`.
///
/// Returns `true` if a row was created.
pub async fn provision_booth(db: &DatabaseConnection, id: &str, name: &str) -> Result<bool> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::Validation {
            message: "Booth id cannot be empty".to_string(),
        });
    }
    if get_booth_by_id(db, id).await?.is_some() {
        return Ok(false);
    }

    booth::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.trim().to_string()),
        balance: Set(0),
    }
    .insert(db)
    .await?;
    Ok(true)
}
