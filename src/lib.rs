pub mod app;
pub mod calendar;
pub mod compiler;
pub mod config;
pub mod datetime;
pub mod error;
pub mod events;
pub mod render;
