//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod payment;
pub mod session;
pub mod student;

// Re-export specific types to avoid conflicts
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use session::{
    Column as SessionColumn, Entity as Session, Model as SessionModel, SessionStatus,
};
pub use student::{BillingType, Column as StudentColumn, Entity as Student, Model as StudentModel};
