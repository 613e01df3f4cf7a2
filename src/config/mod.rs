/// Database configuration and connection management
pub mod database;

/// Client portfolio loading from portfolio.toml
pub mod portfolio;
