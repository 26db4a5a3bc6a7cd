//! Student business logic - Handles all student-related operations.
//!
//! Provides functions for creating, retrieving, updating, archiving and
//! adjusting the balance of students. All functions are async and return
//! Result types for error handling.

use crate::{
    entities::{BillingType, Student, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Fields required to register a new student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    /// Student's name
    pub name: String,
    /// Subject being taught
    pub subject: String,
    /// Hourly rate
    pub rate: f64,
    /// Upfront or postpaid billing
    pub billing_type: BillingType,
    /// Deposit at registration; becomes the starting balance
    pub initial_balance: f64,
}

/// Partial update of a student. `None` leaves the field untouched.
///
/// The balance is deliberately absent: it only moves through settlement,
/// clear-dues and top-ups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    /// New name
    pub name: Option<String>,
    /// New subject
    pub subject: Option<String>,
    /// New hourly rate
    pub rate: Option<f64>,
    /// New billing type
    pub billing_type: Option<BillingType>,
    /// New recorded initial balance (does not touch `balance`)
    pub initial_balance: Option<f64>,
    /// New archive flag
    pub is_archived: Option<bool>,
}

impl StudentChanges {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.subject.is_none()
            && self.rate.is_none()
            && self.billing_type.is_none()
            && self.initial_balance.is_none()
            && self.is_archived.is_none()
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn non_negative_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Retrieves every student, archived ones included, ordered by id.
pub async fn get_all_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all non-archived students, ordered alphabetically by name.
pub async fn get_active_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::IsArchived.eq(false))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by id, returning None if it does not exist.
pub async fn get_student_by_id<C>(db: &C, student_id: i64) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_student_by_id`] but a missing student is an error.
pub async fn require_student<C>(db: &C, student_id: i64) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    get_student_by_id(db, student_id)
        .await?
        .ok_or(Error::StudentNotFound { id: student_id })
}

/// Creates a new student whose balance starts at the initial balance.
///
/// Name and subject are trimmed and must not be empty; rate and initial
/// balance must be finite and non-negative.
pub async fn create_student(db: &DatabaseConnection, new: NewStudent) -> Result<student::Model> {
    let name = required_text("name", &new.name)?;
    let subject = required_text("subject", &new.subject)?;
    let rate = non_negative_amount(new.rate)?;
    let initial_balance = non_negative_amount(new.initial_balance)?;

    let student = student::ActiveModel {
        name: Set(name),
        subject: Set(subject),
        rate: Set(rate),
        billing_type: Set(new.billing_type),
        initial_balance: Set(initial_balance),
        balance: Set(initial_balance),
        is_archived: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = student.insert(db).await?;
    info!(
        "Created student {} ({:?}, rate {})",
        created.id, created.billing_type, created.rate
    );
    Ok(created)
}

/// Applies a partial update to a student. The balance is never recomputed.
///
/// Setting `is_archived` to `true` cascades like [`archive_student`]: the
/// student's pending sessions are removed in the same transaction.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: i64,
    changes: StudentChanges,
) -> Result<student::Model> {
    if changes.is_empty() {
        return require_student(db, student_id).await;
    }

    let txn = db.begin().await?;
    let existing = require_student(&txn, student_id).await?;
    let archiving = changes.is_archived == Some(true);

    let mut active: student::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(required_text("name", &name)?);
    }
    if let Some(subject) = changes.subject {
        active.subject = Set(required_text("subject", &subject)?);
    }
    if let Some(rate) = changes.rate {
        active.rate = Set(non_negative_amount(rate)?);
    }
    if let Some(billing_type) = changes.billing_type {
        active.billing_type = Set(billing_type);
    }
    if let Some(initial_balance) = changes.initial_balance {
        active.initial_balance = Set(non_negative_amount(initial_balance)?);
    }
    if let Some(is_archived) = changes.is_archived {
        active.is_archived = Set(is_archived);
    }
    let updated = active.update(&txn).await?;

    if archiving {
        let removed =
            crate::core::session::delete_pending_sessions_for_student(&txn, student_id).await?;
        info!("Archived student {student_id} via update, removed {removed} pending sessions");
    }

    txn.commit().await?;
    Ok(updated)
}

/// Soft-deletes a student and removes its pending sessions.
///
/// Completed and cancelled sessions are kept for history.
pub async fn archive_student(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    let txn = db.begin().await?;

    let existing = require_student(&txn, student_id).await?;
    let mut active: student::ActiveModel = existing.into();
    active.is_archived = Set(true);
    let archived = active.update(&txn).await?;

    let removed = crate::core::session::delete_pending_sessions_for_student(&txn, student_id).await?;

    txn.commit().await?;
    info!("Archived student {student_id}, removed {removed} pending sessions");
    Ok(archived)
}

/// Resets a student's balance to exactly zero, whatever its sign or billing type.
pub async fn clear_dues(db: &DatabaseConnection, student_id: i64) -> Result<student::Model> {
    let existing = require_student(db, student_id).await?;
    let previous = existing.balance;

    let mut active: student::ActiveModel = existing.into();
    active.balance = Set(0.0);
    let cleared = active.update(db).await?;

    info!("Cleared dues for student {student_id} (was {previous})");
    Ok(cleared)
}

/// Adds `amount_delta` to a student's balance with a single
/// `UPDATE students SET balance = balance + ?` statement.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `student_id` - ID of the student to update
/// * `amount_delta` - Amount to add to the balance (use negative for subtraction)
///
/// # Returns
/// The updated student model
pub async fn adjust_balance_atomic<C>(
    db: &C,
    student_id: i64,
    amount_delta: f64,
) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let result = Student::update_many()
        .col_expr(
            student::Column::Balance,
            Expr::col(student::Column::Balance).add(amount_delta),
        )
        .filter(student::Column::Id.eq(student_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::StudentNotFound { id: student_id });
    }

    require_student(db, student_id).await
}
