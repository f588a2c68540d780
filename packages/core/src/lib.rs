// Library root: exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod runner;
pub mod search;
pub mod services;
