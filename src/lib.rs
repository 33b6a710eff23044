pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod surface;
pub mod ui;
pub mod utils;
