pub mod events;
pub mod handler;
pub mod message;
pub mod server;
pub mod session;
