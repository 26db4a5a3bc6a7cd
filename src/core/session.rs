//! Session business logic - Booking, listing and deleting class sessions.
//!
//! Status changes live in [`crate::core::settlement`] because completing a
//! session also moves the student's balance.

use crate::{
    entities::{Session, SessionStatus, session},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Shortest bookable session, in hours.
pub const MIN_SESSION_HOURS: f64 = 0.25;

/// Fields required to book a session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    /// Student the session is for
    pub student_id: i64,
    /// Calendar date
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub start_time: String,
    /// End time, `HH:MM`
    pub end_time: String,
    /// Billable hours
    pub hours: f64,
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("date must be YYYY-MM-DD, got {value:?}")))
}

/// Parses an `H:MM` or `HH:MM` time and returns it zero-padded, so that times
/// sort correctly as strings.
pub fn normalize_time(field: &str, value: &str) -> Result<String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| Error::validation(format!("{field} must be HH:MM, got {value:?}")))
}

/// Books a new `PENDING` session for an existing student.
pub async fn create_session(db: &DatabaseConnection, new: NewSession) -> Result<session::Model> {
    if !new.hours.is_finite() || new.hours < MIN_SESSION_HOURS {
        return Err(Error::validation(format!(
            "hours must be at least {MIN_SESSION_HOURS}, got {}",
            new.hours
        )));
    }
    let start_time = normalize_time("startTime", &new.start_time)?;
    let end_time = normalize_time("endTime", &new.end_time)?;

    crate::core::student::require_student(db, new.student_id).await?;

    let session = session::ActiveModel {
        student_id: Set(new.student_id),
        date: Set(new.date),
        start_time: Set(start_time),
        end_time: Set(end_time),
        hours: Set(new.hours),
        status: Set(SessionStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = session.insert(db).await?;
    info!(
        "Booked session {} for student {} on {}",
        created.id, created.student_id, created.date
    );
    Ok(created)
}

/// Retrieves every session ordered by date, then start time.
pub async fn get_all_sessions(db: &DatabaseConnection) -> Result<Vec<session::Model>> {
    Session::find()
        .order_by_asc(session::Column::Date)
        .order_by_asc(session::Column::StartTime)
        .order_by_asc(session::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all sessions booked for one student, ordered by date.
pub async fn get_sessions_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<session::Model>> {
    Session::find()
        .filter(session::Column::StudentId.eq(student_id))
        .order_by_asc(session::Column::Date)
        .order_by_asc(session::Column::StartTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a session by id, returning None if it does not exist.
pub async fn get_session_by_id<C>(db: &C, session_id: i64) -> Result<Option<session::Model>>
where
    C: ConnectionTrait,
{
    Session::find_by_id(session_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Hard-deletes a session.
///
/// The student's balance is left alone even when the session was already
/// completed and settled.
pub async fn delete_session(db: &DatabaseConnection, session_id: i64) -> Result<()> {
    let result = Session::delete_by_id(session_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SessionNotFound { id: session_id });
    }
    info!("Deleted session {session_id}");
    Ok(())
}

/// Deletes a student's `PENDING` sessions and returns how many were removed.
pub async fn delete_pending_sessions_for_student<C>(db: &C, student_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Session::delete_many()
        .filter(session::Column::StudentId.eq(student_id))
        .filter(session::Column::Status.eq(SessionStatus::Pending))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::settlement::update_session_status;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("startTime", "9:05").unwrap(), "09:05");
        assert_eq!(normalize_time("startTime", " 14:30 ").unwrap(), "14:30");
        assert!(matches!(
            normalize_time("startTime", "25:00").unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(normalize_time("endTime", "").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[tokio::test]
    async fn test_create_session_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut new = new_session(1, "2025-03-01", 0.1);
        let result = create_session(&db, new.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        new.hours = f64::INFINITY;
        let result = create_session(&db, new.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        new.hours = 1.0;
        new.end_time = "late".to_string();
        let result = create_session(&db, new).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_session_starts_pending() -> Result<()> {
        let (db, student) = setup_with_student().await?;

        let mut new = new_session(student.id, "2025-03-01", 1.5);
        new.start_time = "9:00".to_string();
        new.end_time = "10:30".to_string();
        let session = create_session(&db, new).await?;

        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.student_id, student.id);
        assert_eq!(session.start_time, "09:00");
        assert_eq!(session.end_time, "10:30");
        assert_eq!(session.hours, 1.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_session_unknown_student() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_session(&db, new_session(77, "2025-03-01", 1.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StudentNotFound { id: 77 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_sessions_ordering() -> Result<()> {
        let (db, student) = setup_with_student().await?;

        let mut late = new_session(student.id, "2025-03-02", 1.0);
        late.start_time = "18:00".to_string();
        let late = create_session(&db, late).await?;
        let mut early = new_session(student.id, "2025-03-02", 1.0);
        early.start_time = "08:00".to_string();
        let early = create_session(&db, early).await?;
        let first_day = create_session(&db, new_session(student.id, "2025-03-01", 1.0)).await?;

        let sessions = get_all_sessions(&db).await?;
        let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first_day.id, early.id, late.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_session_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_session(&db, 5).await;
        assert!(matches!(result.unwrap_err(), Error::SessionNotFound { id: 5 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_completed_session_keeps_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_postpaid_student(&db, "Bala", 300.0).await?;
        let session = create_test_session(&db, student.id, "2025-03-01", 1.5).await?;

        update_session_status(&db, session.id, SessionStatus::Completed).await?;
        let settled = crate::core::student::require_student(&db, student.id).await?;
        assert_eq!(settled.balance, 450.0);

        delete_session(&db, session.id).await?;

        assert!(get_session_by_id(&db, session.id).await?.is_none());
        let after = crate::core::student::require_student(&db, student.id).await?;
        assert_eq!(after.balance, 450.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_sessions_for_student() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_postpaid_student(&db, "Bala", 300.0).await?;
        let b = create_postpaid_student(&db, "Chitra", 300.0).await?;

        create_test_session(&db, a.id, "2025-03-01", 1.0).await?;
        create_test_session(&db, a.id, "2025-03-05", 1.0).await?;
        create_test_session(&db, b.id, "2025-03-03", 1.0).await?;

        let sessions = get_sessions_for_student(&db, a.id).await?;
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.student_id == a.id));

        Ok(())
    }
}
