//! Payment entity - Log of manual top-ups made against a student's balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the student who paid
    #[sea_orm(indexed)]
    pub student_id: i64,
    /// Amount paid, always positive
    pub amount: f64,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
}

/// `Payment` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
