//! # Gridkeeper Core
//!
//! Core types, traits, and error handling for Gridkeeper.
//!
//! This crate provides the foundational building blocks used throughout
//! the console, including:
//!
//! - **Types**: `Identifier` and the opaque `EntityRecord`
//! - **Traits**: `Validatable`
//! - **Errors**: Unified error handling with `ConsoleError` and `ConsoleResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ConsoleError, ConsoleResult, ResultExt};
pub use traits::Validatable;
pub use types::{EntityRecord, Identifier, display_scalar};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
