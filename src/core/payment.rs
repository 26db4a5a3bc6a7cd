//! Payment business logic - Manual top-ups and the payment log.

use crate::{
    core::student::{adjust_balance_atomic, require_student},
    entities::{Payment, payment, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Adds a positive amount to a student's balance and records the payment.
///
/// Both writes share one transaction, so a logged payment always matches a
/// balance change.
pub async fn top_up(
    db: &DatabaseConnection,
    student_id: i64,
    amount: f64,
) -> Result<student::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    require_student(&txn, student_id).await?;

    let payment = payment::ActiveModel {
        student_id: Set(student_id),
        amount: Set(amount),
        paid_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    payment.insert(&txn).await?;

    let updated = adjust_balance_atomic(&txn, student_id, amount).await?;

    txn.commit().await?;
    info!(
        "Top-up of {amount} for student {student_id}, balance now {}",
        updated.balance
    );
    Ok(updated)
}

/// Retrieves a student's payments, newest first.
pub async fn get_payments_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::StudentId.eq(student_id))
        .order_by_desc(payment::Column::PaidAt)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_top_up_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = top_up(&db, 1, amount).await;
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_top_up_increments_and_logs() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_upfront_student(&db, "Asha", 500.0, 1000.0).await?;

        let updated = top_up(&db, student.id, 2500.0).await?;
        assert_eq!(updated.balance, 3500.0);

        top_up(&db, student.id, 100.0).await?;

        let payments = get_payments_for_student(&db, student.id).await?;
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount, 100.0);
        assert_eq!(payments[1].amount, 2500.0);
        assert!(payments.iter().all(|p| p.student_id == student.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_top_up_unknown_student_logs_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let result = top_up(&db, 31, 100.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StudentNotFound { id: 31 }
        ));

        let payments = get_payments_for_student(&db, 31).await?;
        assert!(payments.is_empty());

        Ok(())
    }
}
