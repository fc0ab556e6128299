pub mod chat;
pub mod config;
pub mod error;

// Re-export common error type
pub use error::{Result, SpendlyError};
