//! Student endpoints - roster CRUD, archive, clear-dues, top-up, payments and invoice.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath, ApiQuery, number_like},
    },
    core::{
        payment,
        report::{self, Invoice},
        student::{self, NewStudent, StudentChanges},
    },
    entities::{BillingType, payment::Model as PaymentModel, student::Model as StudentModel},
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Query string of `GET /students`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListStudentsQuery {
    /// When true, archived students are left out
    #[serde(default)]
    pub active: bool,
}

/// Body of `POST /students`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateStudentBody {
    /// Student's name
    pub name: Option<String>,
    /// Subject taught
    pub subject: Option<String>,
    /// Hourly rate, number or numeric string
    pub rate: Option<Value>,
    /// Billing type
    #[serde(alias = "type")]
    pub billing_type: Option<BillingType>,
    /// Starting deposit; missing or non-numeric means 0
    pub initial_balance: Option<Value>,
}

impl CreateStudentBody {
    /// Checks required fields and converts into a [`NewStudent`].
    pub fn into_new_student(self) -> Result<NewStudent> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.subject.is_none() {
            missing.push("subject");
        }
        if self.rate.as_ref().is_none_or(Value::is_null) {
            missing.push("rate");
        }
        if self.billing_type.is_none() {
            missing.push("billingType");
        }

        match (self.name, self.subject, self.rate, self.billing_type) {
            (Some(name), Some(subject), Some(rate), Some(billing_type)) if missing.is_empty() => {
                Ok(NewStudent {
                    name,
                    subject,
                    rate: parse_number("rate", &rate)?,
                    billing_type,
                    initial_balance: self
                        .initial_balance
                        .as_ref()
                        .and_then(number_like)
                        .unwrap_or(0.0),
                })
            }
            _ => Err(Error::validation(format!(
                "{} required",
                missing.join(", ")
            ))),
        }
    }
}

/// Body of `PUT /students/:id`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStudentBody {
    /// New name
    pub name: Option<String>,
    /// New subject
    pub subject: Option<String>,
    /// New hourly rate
    pub rate: Option<Value>,
    /// New billing type
    #[serde(alias = "type")]
    pub billing_type: Option<BillingType>,
    /// New recorded initial balance
    pub initial_balance: Option<Value>,
    /// New archive flag
    pub is_archived: Option<bool>,
}

impl UpdateStudentBody {
    /// Converts into [`StudentChanges`], rejecting non-numeric amounts.
    pub fn into_changes(self) -> Result<StudentChanges> {
        Ok(StudentChanges {
            name: self.name,
            subject: self.subject,
            rate: self
                .rate
                .as_ref()
                .map(|v| parse_number("rate", v))
                .transpose()?,
            billing_type: self.billing_type,
            initial_balance: self
                .initial_balance
                .as_ref()
                .map(|v| parse_number("initialBalance", v))
                .transpose()?,
            is_archived: self.is_archived,
        })
    }
}

/// Body of `PUT /students/:id/topup`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopUpBody {
    /// Amount paid, number or numeric string
    pub amount: Option<Value>,
}

fn parse_number(field: &str, value: &Value) -> Result<f64> {
    number_like(value).ok_or_else(|| Error::validation(format!("{field} must be a number")))
}

/// `GET /students`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListStudentsQuery>,
) -> Result<Json<Vec<StudentModel>>> {
    let students = if query.active {
        student::get_active_students(state.database.as_ref()).await?
    } else {
        student::get_all_students(state.database.as_ref()).await?
    };
    debug!("Listing {} students", students.len());
    Ok(Json(students))
}

/// `POST /students`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateStudentBody>,
) -> Result<(StatusCode, Json<StudentModel>)> {
    let created = student::create_student(state.database.as_ref(), body.into_new_student()?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /students/:id`
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<StudentModel>> {
    student::require_student(state.database.as_ref(), id).await.map(Json)
}

/// `PUT /students/:id`
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateStudentBody>,
) -> Result<Json<StudentModel>> {
    student::update_student(state.database.as_ref(), id, body.into_changes()?)
        .await
        .map(Json)
}

/// `PUT /students/:id/archive`
pub async fn archive(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<StudentModel>> {
    student::archive_student(state.database.as_ref(), id).await.map(Json)
}

/// `PUT /students/:id/clear-dues`
pub async fn clear_dues(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<StudentModel>> {
    student::clear_dues(state.database.as_ref(), id).await.map(Json)
}

/// `PUT /students/:id/topup`
pub async fn top_up(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<TopUpBody>,
) -> Result<Json<StudentModel>> {
    let amount = body
        .amount
        .as_ref()
        .and_then(number_like)
        .ok_or_else(|| Error::validation("Invalid amount"))?;
    payment::top_up(state.database.as_ref(), id, amount).await.map(Json)
}

/// `GET /students/:id/payments`
pub async fn payments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<PaymentModel>>> {
    student::require_student(state.database.as_ref(), id).await?;
    payment::get_payments_for_student(state.database.as_ref(), id)
        .await
        .map(Json)
}

/// `GET /students/:id/invoice`
pub async fn invoice(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Invoice>> {
    report::generate_invoice(state.database.as_ref(), id, &state.config.reports.currency_symbol)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    fn create_body(value: Value) -> CreateStudentBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_create_body_accepts_legacy_type_and_string_numbers() {
        let new = create_body(json!({
            "name": "Asha",
            "subject": "Maths",
            "rate": "500",
            "type": "UPFRONT",
            "initialBalance": "5000"
        }))
        .into_new_student()
        .unwrap();

        assert_eq!(new.rate, 500.0);
        assert_eq!(new.billing_type, BillingType::Upfront);
        assert_eq!(new.initial_balance, 5000.0);
    }

    #[test]
    fn test_create_body_invalid_initial_balance_defaults_to_zero() {
        let new = create_body(json!({
            "name": "Bala",
            "subject": "Physics",
            "rate": 300,
            "billingType": "POSTPAID",
            "initialBalance": "lots"
        }))
        .into_new_student()
        .unwrap();

        assert_eq!(new.initial_balance, 0.0);
    }

    #[test]
    fn test_create_body_reads_leading_number_of_initial_balance() {
        let new = create_body(json!({
            "name": "Chitra",
            "subject": "Chemistry",
            "rate": "450/hr",
            "billingType": "UPFRONT",
            "initialBalance": "12abc"
        }))
        .into_new_student()
        .unwrap();

        assert_eq!(new.rate, 450.0);
        assert_eq!(new.initial_balance, 12.0);
    }

    #[test]
    fn test_create_body_reports_missing_fields() {
        let err = create_body(json!({ "name": "Bala", "rate": null }))
            .into_new_student()
            .unwrap_err();

        assert_eq!(err.to_string(), "subject, rate, billingType required");
    }

    #[test]
    fn test_create_body_rejects_unknown_fields() {
        let result: std::result::Result<CreateStudentBody, _> =
            serde_json::from_value(json!({ "name": "Bala", "balance": 100 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_body_rejects_non_numeric_rate() {
        let body: UpdateStudentBody = serde_json::from_value(json!({ "rate": "cheap" })).unwrap();
        assert!(matches!(
            body.into_changes().unwrap_err(),
            Error::Validation { .. }
        ));
    }
}
