// Library surface for headless/integration tests and reuse.
// main.rs only wires the terminal, the CLI and the HTTP backend together.
pub mod api;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dashboard;
pub mod headless;
pub mod history;
pub mod logging;
pub mod poller;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod upload;
pub mod util;
pub mod view;
