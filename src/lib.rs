// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod logging;
pub mod prompts;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod timer;
pub mod ui;
pub mod wheel;
