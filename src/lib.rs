pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod figures;

pub use config::Config;
