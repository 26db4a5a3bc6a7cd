//! Core business logic, independent of the HTTP layer.

/// Top-ups and the payment log
pub mod payment;
/// Dashboard, chart and invoice aggregates
pub mod report;
/// Session booking, listing and deletion
pub mod session;
/// Balance settlement on session completion
pub mod settlement;
/// Student CRUD, archive and balance adjustments
pub mod student;
