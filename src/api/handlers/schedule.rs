//! Schedule endpoints - booking, status changes and deletion of class sessions.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath, number_like},
    },
    core::{
        session::{self, NewSession},
        settlement,
    },
    entities::{SessionStatus, session::Model as SessionModel},
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const REQUIRED_FIELDS_MESSAGE: &str = "studentId, date, startTime, endTime and hours are required";

/// Body of `POST /schedule`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSessionBody {
    /// Student the session is for
    pub student_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    #[serde(alias = "time")]
    pub start_time: Option<String>,
    /// `HH:MM`
    pub end_time: Option<String>,
    /// Billable hours, number or numeric string
    pub hours: Option<Value>,
}

impl CreateSessionBody {
    /// Checks that every field is present and converts into a [`NewSession`].
    pub fn into_new_session(self) -> Result<NewSession> {
        let (Some(student_id), Some(date), Some(start_time), Some(end_time), Some(hours)) = (
            self.student_id,
            self.date.filter(|d| !d.trim().is_empty()),
            self.start_time.filter(|t| !t.trim().is_empty()),
            self.end_time.filter(|t| !t.trim().is_empty()),
            self.hours,
        ) else {
            return Err(Error::validation(REQUIRED_FIELDS_MESSAGE));
        };

        let hours = number_like(&hours).ok_or_else(|| Error::validation("hours must be a number"))?;

        Ok(NewSession {
            student_id,
            date: session::parse_date(&date)?,
            start_time,
            end_time,
            hours,
        })
    }
}

/// Body of `PUT /schedule/:id/status`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusBody {
    /// Requested status
    pub status: Option<SessionStatus>,
}

/// Response of `DELETE /schedule/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAck {
    /// Confirmation message
    pub message: &'static str,
    /// Id of the deleted session
    pub id: i64,
}

/// `GET /schedule`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SessionModel>>> {
    session::get_all_sessions(state.database.as_ref()).await.map(Json)
}

/// `POST /schedule`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateSessionBody>,
) -> Result<(StatusCode, Json<SessionModel>)> {
    let created = session::create_session(state.database.as_ref(), body.into_new_session()?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /schedule/:id/status`
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<SessionModel>> {
    let status = body
        .status
        .ok_or_else(|| Error::validation("status is required"))?;
    settlement::update_session_status(state.database.as_ref(), id, status)
        .await
        .map(Json)
}

/// `DELETE /schedule/:id`
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteAck>> {
    session::delete_session(state.database.as_ref(), id).await?;
    Ok(Json(DeleteAck {
        message: "Class deleted",
        id,
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_requires_every_field() {
        let body: CreateSessionBody = serde_json::from_value(json!({
            "studentId": 1,
            "date": "2025-03-01",
            "startTime": "10:00",
            "hours": 1
        }))
        .unwrap();

        let err = body.into_new_session().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn test_create_body_blank_date_counts_as_missing() {
        let body: CreateSessionBody = serde_json::from_value(json!({
            "studentId": 1,
            "date": "  ",
            "startTime": "10:00",
            "endTime": "11:00",
            "hours": 1
        }))
        .unwrap();

        let err = body.into_new_session().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn test_create_body_accepts_legacy_time_field() {
        let body: CreateSessionBody = serde_json::from_value(json!({
            "studentId": 3,
            "date": "2025-03-01",
            "time": "16:00",
            "endTime": "17:30",
            "hours": "1.5"
        }))
        .unwrap();

        let new = body.into_new_session().unwrap();
        assert_eq!(new.student_id, 3);
        assert_eq!(new.start_time, "16:00");
        assert_eq!(new.hours, 1.5);
    }

    #[test]
    fn test_status_body_rejects_unknown_status() {
        let result: std::result::Result<StatusBody, _> =
            serde_json::from_value(json!({ "status": "DONE" }));
        assert!(result.is_err());

        let body: StatusBody = serde_json::from_value(json!({ "status": "COMPLETED" })).unwrap();
        assert_eq!(body.status, Some(SessionStatus::Completed));
    }
}
