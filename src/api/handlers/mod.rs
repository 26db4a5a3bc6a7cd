//! HTTP handlers organized by resource.

/// Health check
pub mod general;
/// Dashboard and report endpoints
pub mod report;
/// Schedule (class session) endpoints
pub mod schedule;
/// Student endpoints
pub mod student;
