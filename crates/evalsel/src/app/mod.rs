//! Application layer orchestrating domain logic and infrastructure.

pub mod bridge;
pub mod commands;
pub mod context;
pub mod selection;
pub mod splice;
