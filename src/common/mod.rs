// Common utilities and shared types used across the application

pub mod constants;
pub mod error;

pub use error::{NormalizeError, Result};
