pub mod commands;
pub mod connection;
pub mod ds;
pub mod frame;
pub mod handler;
pub mod persist;
pub mod server;
pub mod store;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
