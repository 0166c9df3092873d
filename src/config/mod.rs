/// Record store connection and table creation
pub mod database;

/// Participant and booth roster loading from a TOML file
pub mod roster;

/// Environment-driven application settings
pub mod settings;

pub use settings::AppConfig;
