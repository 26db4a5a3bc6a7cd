/// Database configuration and connection management
pub mod database;

/// Server and report settings loaded from config.toml
pub mod settings;

pub use settings::{AppConfig, load_default_config};
