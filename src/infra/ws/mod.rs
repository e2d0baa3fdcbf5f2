pub mod broadcaster;
pub mod connection;
