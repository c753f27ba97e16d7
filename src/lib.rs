pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod search;
pub mod ui;
