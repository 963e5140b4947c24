//! Access control
//!
//! A single allow-listed principal, talking to the relay in a direct
//! conversation, is the only party the relay answers.

pub mod validator;

pub use validator::{is_authorized_principal, is_direct_session, is_permitted};
