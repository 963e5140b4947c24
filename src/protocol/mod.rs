//! Command protocol
//!
//! Handles command parsing, execution and reply rendering.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, parse_callback, parse_command};
pub use handlers::handle_command;
