//! Server core functionality
//!
//! The run loop that feeds updates to the relay.

pub mod console;
pub mod core;

pub use core::Server;
