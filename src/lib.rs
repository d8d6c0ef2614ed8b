// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod catalog;
pub mod celebration;
pub mod config;
pub mod evaluator;
pub mod game;
pub mod history;
pub mod logging;
pub mod puzzle;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod store;
pub mod util;
