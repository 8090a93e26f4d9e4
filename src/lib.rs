// The binary in main.rs drives everything through this library so the
// integration tests under tests/ can exercise the same controller.
pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod service;
pub mod session;
pub mod store;
pub mod ui;
pub mod worker;
