/// Shared store location, connection management and schema creation
pub mod database;

/// Application settings loading from config.toml
pub mod settings;
