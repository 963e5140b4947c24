pub mod auth;
pub mod config;
pub mod error;
pub mod navigate;
pub mod protocol;
pub mod server;
pub mod session;
pub mod storage;
pub mod transfer;
pub mod transport;

pub use server::Server;
pub use session::Relay;
