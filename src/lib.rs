pub mod api;
pub mod app;
pub mod assign;
pub mod config;
pub mod error;
pub mod model;
pub mod router;
pub mod screens;
pub mod session;
pub mod store;
