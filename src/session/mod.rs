//! Update handling
//!
//! Owns the relay components and processes one inbound update at a time.

pub mod handler;

pub use handler::Relay;
