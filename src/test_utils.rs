//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        session::{self, NewSession},
        student::{self, NewStudent},
    },
    entities::{self, BillingType, SessionStatus},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a [`NewStudent`] with subject "Maths".
#[must_use]
pub fn new_student(
    name: &str,
    billing_type: BillingType,
    rate: f64,
    initial_balance: f64,
) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        subject: "Maths".to_string(),
        rate,
        billing_type,
        initial_balance,
    }
}

/// Builds a [`NewSession`] running 10:00-11:00 on the given `YYYY-MM-DD` date.
///
/// # Panics
/// Panics if `date` is not a valid date.
#[must_use]
#[allow(clippy::expect_used)]
pub fn new_session(student_id: i64, date: &str, hours: f64) -> NewSession {
    NewSession {
        student_id,
        date: session::parse_date(date).expect("test date must be valid"),
        start_time: "10:00".to_string(),
        end_time: "11:00".to_string(),
        hours,
    }
}

/// Creates an upfront student with the given rate and deposit.
pub async fn create_upfront_student(
    db: &DatabaseConnection,
    name: &str,
    rate: f64,
    initial_balance: f64,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        new_student(name, BillingType::Upfront, rate, initial_balance),
    )
    .await
}

/// Creates a postpaid student with the given rate and a zero balance.
pub async fn create_postpaid_student(
    db: &DatabaseConnection,
    name: &str,
    rate: f64,
) -> Result<entities::student::Model> {
    student::create_student(db, new_student(name, BillingType::Postpaid, rate, 0.0)).await
}

/// Books a pending test session.
pub async fn create_test_session(
    db: &DatabaseConnection,
    student_id: i64,
    date: &str,
    hours: f64,
) -> Result<entities::session::Model> {
    session::create_session(db, new_session(student_id, date, hours)).await
}

/// Inserts a session whose student does not exist, bypassing the booking checks.
pub async fn insert_orphan_session(
    db: &DatabaseConnection,
    student_id: i64,
    date: &str,
) -> Result<entities::session::Model> {
    let orphan = entities::session::ActiveModel {
        student_id: Set(student_id),
        date: Set(session::parse_date(date)?),
        start_time: Set("10:00".to_string()),
        end_time: Set("11:00".to_string()),
        hours: Set(1.0),
        status: Set(SessionStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    orphan.insert(db).await.map_err(Into::into)
}

/// Overwrites a session's status without running settlement.
pub async fn set_status_directly(
    db: &DatabaseConnection,
    session_id: i64,
    status: SessionStatus,
) -> Result<entities::session::Model> {
    let model = entities::session::ActiveModel {
        id: Set(session_id),
        status: Set(status),
        ..Default::default()
    };
    model.update(db).await.map_err(Into::into)
}

/// Sets up a test environment with one postpaid student (rate 300).
/// Returns (db, student) for common test scenarios.
pub async fn setup_with_student() -> Result<(DatabaseConnection, entities::student::Model)> {
    let db = setup_test_db().await?;
    let student = create_postpaid_student(&db, "Test Student", 300.0).await?;
    Ok((db, student))
}
