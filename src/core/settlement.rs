//! Balance settlement on session completion.
//!
//! When a session first reaches `COMPLETED`, the student is charged
//! `rate × hours`: an `UPFRONT` student's prepaid credit goes down, a
//! `POSTPAID` student's debt goes up. The stored status is checked inside the
//! same database transaction so repeating a completion never charges twice.
//! Any other status change only touches the session.

use crate::{
    core::{
        session::get_session_by_id,
        student::{adjust_balance_atomic, get_student_by_id},
    },
    entities::{BillingType, SessionStatus, session},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

/// Hours to bill for a session; sessions without usable hours bill as one hour.
#[must_use]
pub fn billable_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        1.0
    }
}

/// Signed change to a student's balance for one completed session.
#[must_use]
pub fn settlement_delta(billing_type: BillingType, rate: f64, hours: f64) -> f64 {
    let amount = rate * billable_hours(hours);
    match billing_type {
        BillingType::Upfront => -amount,
        BillingType::Postpaid => amount,
    }
}

/// Whether moving from `current` to `requested` must settle the balance.
#[must_use]
pub fn should_settle(current: SessionStatus, requested: SessionStatus) -> bool {
    requested == SessionStatus::Completed && current != SessionStatus::Completed
}

/// Changes a session's status, settling the student's balance on the first
/// transition to `COMPLETED`.
///
/// The balance write precedes the status write and both run in one
/// transaction. If the student no longer exists the status still changes and
/// no balance is touched.
///
/// # Errors
/// Returns [`Error::SessionNotFound`] if no session has this id.
pub async fn update_session_status(
    db: &DatabaseConnection,
    session_id: i64,
    status: SessionStatus,
) -> Result<session::Model> {
    let txn = db.begin().await?;

    let existing = get_session_by_id(&txn, session_id)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })?;

    if should_settle(existing.status, status) {
        match get_student_by_id(&txn, existing.student_id).await? {
            Some(student) => {
                let delta = settlement_delta(student.billing_type, student.rate, existing.hours);
                let updated = adjust_balance_atomic(&txn, student.id, delta).await?;
                info!(
                    "Settled session {session_id}: student {} balance {} -> {}",
                    student.id, student.balance, updated.balance
                );
            }
            None => {
                warn!(
                    "Session {session_id} completed but student {} no longer exists; balance not settled",
                    existing.student_id
                );
            }
        }
    } else {
        debug!(
            "Session {session_id}: {:?} -> {status:?}, no settlement",
            existing.status
        );
    }

    let mut active: session::ActiveModel = existing.into();
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}
