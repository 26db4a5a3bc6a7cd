//! Session entity - A scheduled or held tuition class.
//!
//! Sessions start as `PENDING` and are moved to `COMPLETED` or `CANCELLED`.
//! The first move to `COMPLETED` settles the student's balance
//! (see `core::settlement`).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a class session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Booked, not yet held
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Held; triggers settlement on first transition
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Called off
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the student this session is for
    #[sea_orm(indexed)]
    pub student_id: i64,
    /// Calendar date of the session
    pub date: Date,
    /// Start time as zero-padded `HH:MM`
    pub start_time: String,
    /// End time as zero-padded `HH:MM`
    pub end_time: String,
    /// Billable hours, at least 0.25
    pub hours: f64,
    /// Current status
    pub status: SessionStatus,
    /// When the session was booked
    pub created_at: DateTimeUtc,
}

/// No foreign key to `students`; see [`super::student::Relation`].
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
