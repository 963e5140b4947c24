//! File system storage management
//!
//! Handles the two storage roots, name sanitization and path validation.

pub mod roots;
pub mod validation;

pub use roots::{Root, Roots};
pub use validation::{safe_join, safe_join_dir, sanitize_filename};
