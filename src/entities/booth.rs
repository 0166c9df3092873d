//! Booth entity - A vendor stand that accumulates points from participants.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booth database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booths")]
pub struct Model {
    /// Booth identifier printed at the stand (e.g. `"A1"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Points received so far
    pub balance: i64,
}

/// Defines relationships between Booth and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One booth receives many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
