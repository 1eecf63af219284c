pub mod analyze;
pub mod angle;
pub mod config;
pub mod validate;
