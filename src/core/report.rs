//! Report generation business logic.
//!
//! This module computes the figures the dashboard, earnings chart and invoice
//! screens display. Everything except [`generate_invoice`] is a pure function
//! over already-fetched students and sessions; nothing here is stored.

use crate::{
    core::settlement::billable_hours,
    entities::{BillingType, SessionStatus, session, student},
    errors::Result,
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Label shown for sessions whose student record is gone.
pub const DELETED_STUDENT_LABEL: &str = "Deleted Student";

/// Lifetime earnings, split by billing type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    /// Sum of initial deposits of upfront students
    pub upfront_collected: f64,
    /// Sum of rates over completed sessions of postpaid students
    pub postpaid_earned: f64,
    /// `upfront_collected + postpaid_earned`
    pub total: f64,
}

/// A pending session annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// The session itself
    #[serde(flatten)]
    pub session: session::Model,
    /// Student name, or [`DELETED_STUDENT_LABEL`]
    pub student_name: String,
    /// Start time in 12-hour form, e.g. `2:30 PM`
    pub time_label: String,
    /// Whether the session is on the reference date
    pub is_today: bool,
}

/// One bar of the monthly earnings chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub key: String,
    /// Short month name, e.g. `Mar`
    pub label: String,
    /// Earnings attributed to the month
    pub value: f64,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Lifetime earnings
    pub earnings: EarningsSummary,
    /// Money owed by active postpaid students
    pub pending_collection: f64,
    /// Upcoming sessions in chronological order
    pub timeline: Vec<TimelineEntry>,
}

/// One billed session on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// Session billed
    pub session_id: i64,
    /// Session date
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub start_time: String,
    /// End time, `HH:MM`
    pub end_time: String,
    /// Hours billed
    pub hours: f64,
    /// `rate × hours`
    pub amount: f64,
    /// `amount` formatted with the currency symbol
    pub amount_display: String,
}

/// Statement of a student's completed sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Student billed
    pub student_id: i64,
    /// Student's name
    pub student_name: String,
    /// Subject taught
    pub subject: String,
    /// Hourly rate used for every line
    pub rate: f64,
    /// Student's billing type
    pub billing_type: BillingType,
    /// Completed sessions, oldest first
    pub lines: Vec<InvoiceLine>,
    /// Sum of line amounts
    pub total: f64,
    /// `total` formatted with the currency symbol
    pub total_display: String,
    /// The student's stored balance, which can differ from `total` after
    /// clear-dues or top-ups
    pub balance_due: f64,
}

/// Lifetime earnings: upfront deposits plus one `rate` per completed session
/// of a postpaid student.
///
/// Postpaid sessions count their rate once regardless of hours, unlike the
/// invoice which bills `rate × hours`.
#[must_use]
pub fn lifetime_earnings(
    students: &[student::Model],
    sessions: &[session::Model],
) -> EarningsSummary {
    let upfront_collected = students
        .iter()
        .filter(|s| s.billing_type == BillingType::Upfront)
        .map(|s| s.initial_balance)
        .sum::<f64>();

    let by_id = index_students(students);
    let postpaid_earned = sessions
        .iter()
        .filter(|c| c.status == SessionStatus::Completed)
        .filter_map(|c| by_id.get(&c.student_id))
        .filter(|s| s.billing_type == BillingType::Postpaid)
        .map(|s| s.rate)
        .sum::<f64>();

    EarningsSummary {
        upfront_collected,
        postpaid_earned,
        total: upfront_collected + postpaid_earned,
    }
}

/// Active postpaid students who currently owe money.
#[must_use]
pub fn students_with_dues(students: &[student::Model]) -> Vec<&student::Model> {
    students
        .iter()
        .filter(|s| !s.is_archived && s.billing_type == BillingType::Postpaid && s.balance > 0.0)
        .collect()
}

/// Total owed by active postpaid students.
#[must_use]
pub fn pending_collection(students: &[student::Model]) -> f64 {
    students_with_dues(students)
        .into_iter()
        .map(|s| s.balance)
        .sum()
}

/// Pending sessions sorted by date then start time.
#[must_use]
pub fn timeline(
    students: &[student::Model],
    sessions: &[session::Model],
    today: NaiveDate,
) -> Vec<TimelineEntry> {
    let by_id = index_students(students);

    let mut pending: Vec<&session::Model> = sessions
        .iter()
        .filter(|c| c.status == SessionStatus::Pending)
        .collect();
    pending.sort_by(|a, b| {
        (a.date, &a.start_time, a.id).cmp(&(b.date, &b.start_time, b.id))
    });

    pending
        .into_iter()
        .map(|c| TimelineEntry {
            session: c.clone(),
            student_name: by_id
                .get(&c.student_id)
                .map_or_else(|| DELETED_STUDENT_LABEL.to_string(), |s| s.name.clone()),
            time_label: format_time_12h(&c.start_time),
            is_today: c.date == today,
        })
        .collect()
}

/// Builds the dashboard from the full student and session collections.
#[must_use]
pub fn dashboard(
    students: &[student::Model],
    sessions: &[session::Model],
    today: NaiveDate,
) -> Dashboard {
    Dashboard {
        earnings: lifetime_earnings(students, sessions),
        pending_collection: pending_collection(students),
        timeline: timeline(students, sessions, today),
    }
}

/// Earnings bucketed by month, keeping the most recent `months` buckets.
///
/// Completed postpaid sessions add the student's rate to the session's month;
/// upfront students with a deposit add it to the month they were created in.
/// Months with no earnings are not emitted.
#[must_use]
pub fn monthly_chart(
    students: &[student::Model],
    sessions: &[session::Model],
    months: usize,
) -> Vec<MonthlyBucket> {
    let by_id = index_students(students);
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for c in sessions.iter().filter(|c| c.status == SessionStatus::Completed) {
        if let Some(s) = by_id.get(&c.student_id) {
            if s.billing_type == BillingType::Postpaid {
                *buckets.entry((c.date.year(), c.date.month())).or_default() += s.rate;
            }
        }
    }

    for s in students
        .iter()
        .filter(|s| s.billing_type == BillingType::Upfront && s.initial_balance > 0.0)
    {
        *buckets
            .entry((s.created_at.year(), s.created_at.month()))
            .or_default() += s.initial_balance;
    }

    let skip = buckets.len().saturating_sub(months);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), value)| {
            let key = format!("{year:04}-{month:02}");
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map_or_else(|| key.clone(), |d| d.format("%b").to_string());
            MonthlyBucket { key, label, value }
        })
        .collect()
}

/// Builds an invoice from a student and any sessions; only that student's
/// completed sessions are billed.
#[must_use]
pub fn build_invoice(
    student: &student::Model,
    sessions: &[session::Model],
    currency_symbol: &str,
) -> Invoice {
    let mut billed: Vec<&session::Model> = sessions
        .iter()
        .filter(|c| c.student_id == student.id && c.status == SessionStatus::Completed)
        .collect();
    billed.sort_by(|a, b| (a.date, &a.start_time, a.id).cmp(&(b.date, &b.start_time, b.id)));

    let lines: Vec<InvoiceLine> = billed
        .into_iter()
        .map(|c| {
            let hours = billable_hours(c.hours);
            let amount = student.rate * hours;
            InvoiceLine {
                session_id: c.id,
                date: c.date,
                start_time: c.start_time.clone(),
                end_time: c.end_time.clone(),
                hours,
                amount,
                amount_display: format_currency(amount, currency_symbol),
            }
        })
        .collect();

    let total = lines.iter().map(|l| l.amount).sum::<f64>();

    Invoice {
        student_id: student.id,
        student_name: student.name.clone(),
        subject: student.subject.clone(),
        rate: student.rate,
        billing_type: student.billing_type,
        lines,
        total,
        total_display: format_currency(total, currency_symbol),
        balance_due: student.balance,
    }
}

/// Loads a student and their sessions and builds the invoice.
///
/// # Errors
/// Returns [`crate::errors::Error::StudentNotFound`] for an unknown student.
pub async fn generate_invoice(
    db: &DatabaseConnection,
    student_id: i64,
    currency_symbol: &str,
) -> Result<Invoice> {
    let student = crate::core::student::require_student(db, student_id).await?;
    let sessions = crate::core::session::get_sessions_for_student(db, student_id).await?;
    Ok(build_invoice(&student, &sessions, currency_symbol))
}

/// Formats an amount with a currency symbol, thousands separators and two
/// decimals, e.g. `₹12,500.00` or `-₹450.00`.
#[must_use]
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction}")
}

/// Renders an `HH:MM` time as `h:MM AM/PM`. Unparseable input is returned as is.
#[must_use]
pub fn format_time_12h(time: &str) -> String {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_or_else(|_| time.to_string(), |t| t.format("%-I:%M %p").to_string())
}

fn index_students(students: &[student::Model]) -> HashMap<i64, &student::Model> {
    students.iter().map(|s| (s.id, s)).collect()
}
