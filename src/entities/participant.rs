//! Participant entity - An event attendee holding a points balance.
//!
//! Participants are keyed by phone number. Rows are provisioned before the event
//! with no password; activation sets `password_hash` and flips `is_activated`
//! exactly once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Participant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    /// Phone number, the participant's unique and immutable key
    #[sea_orm(primary_key, auto_increment = false)]
    pub phone: String,
    /// Argon2 PHC string, `None` until the account is activated
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether the participant has set a password
    pub is_activated: bool,
    /// Current points balance
    pub balance: i64,
}

/// Participants are referenced by transactions through a denormalised phone
/// column, so no relation is declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
