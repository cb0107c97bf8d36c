//! HTTP request handlers organized by resource

pub mod catalog;
pub mod health;
pub mod plan;

// Re-export all handlers for use in router
pub use catalog::*;
pub use health::*;
pub use plan::*;
