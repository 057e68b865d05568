//! Core traits for the dependency injection system.

pub mod injectable;

pub use injectable::Injectable;
