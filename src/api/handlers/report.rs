//! Read-only report endpoints: dashboard, monthly earnings chart and dues list.

use crate::{
    api::AppState,
    core::{
        report::{self, Dashboard, MonthlyBucket},
        session, student,
    },
    entities::student::Model as StudentModel,
    errors::Result,
};
use axum::{Json, extract::State};

/// `GET /dashboard`
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>> {
    let students = student::get_all_students(state.database.as_ref()).await?;
    let sessions = session::get_all_sessions(state.database.as_ref()).await?;
    let today = chrono::Local::now().date_naive();

    Ok(Json(report::dashboard(&students, &sessions, today)))
}

/// `GET /reports/monthly`
pub async fn monthly(State(state): State<AppState>) -> Result<Json<Vec<MonthlyBucket>>> {
    let students = student::get_all_students(state.database.as_ref()).await?;
    let sessions = session::get_all_sessions(state.database.as_ref()).await?;

    Ok(Json(report::monthly_chart(
        &students,
        &sessions,
        state.config.reports.chart_months,
    )))
}

/// `GET /reports/pending`
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<StudentModel>>> {
    let students = student::get_all_students(state.database.as_ref()).await?;
    let owing = report::students_with_dues(&students)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(owing))
}
