//! Infrastructure adapters for IO, config, and external processes.

pub mod config;
pub mod logging;
pub mod process;
pub mod workspace;
