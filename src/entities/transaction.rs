//! Transaction entity - Append-only record of one points transfer.
//!
//! Each row captures the paying participant's phone, the receiving booth's id,
//! a snapshot of the booth name at transfer time, the amount, an optional note,
//! and the creation timestamp. Rows are never updated or deleted.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Phone of the participant who paid
    pub participant_phone: String,
    /// Booth that received the points
    pub booth_id: String,
    /// Booth name as it was when the transfer happened
    pub booth_name: String,
    /// Points moved, always positive
    pub amount: i64,
    /// Free-form note entered by the participant (may be empty)
    pub note: String,
    /// When the transfer was committed
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction credits one booth
    #[sea_orm(
        belongs_to = "super::booth::Entity",
        from = "Column::BoothId",
        to = "super::booth::Column::Id"
    )]
    Booth,
}

impl Related<super::booth::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booth.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
