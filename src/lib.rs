pub mod api;
pub mod config;
pub mod logging;
pub mod render;
pub mod service;
pub mod tui;
