//! Core domain types shared across the application.

pub mod document;
pub mod errors;
pub mod model;
