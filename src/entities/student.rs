//! Student entity - Billing configuration for a tutored student.
//!
//! Each student has an hourly rate, a billing type and a running balance.
//! The meaning of `balance` depends on the billing type: remaining prepaid
//! credit for `UPFRONT`, amount owed for `POSTPAID`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a student pays for sessions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    /// Pre-paid deposit, balance is decremented as sessions complete
    #[sea_orm(string_value = "UPFRONT")]
    Upfront,
    /// Billed afterwards, balance is incremented as sessions complete
    #[sea_orm(string_value = "POSTPAID")]
    Postpaid,
}

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student's name
    pub name: String,
    /// Subject being taught
    pub subject: String,
    /// Hourly rate
    pub rate: f64,
    /// Upfront or postpaid billing
    pub billing_type: BillingType,
    /// Deposit recorded at creation, used for lifetime earnings only
    pub initial_balance: f64,
    /// Current running balance
    pub balance: f64,
    /// Soft delete flag - archived students keep their history
    pub is_archived: bool,
    /// When the student was created
    pub created_at: DateTimeUtc,
}

/// Sessions and payments reference students by id only. There is no foreign
/// key so a session can outlive its student.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
