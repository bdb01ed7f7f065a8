pub mod config;
pub mod database;
pub mod generation;
pub mod logging;
