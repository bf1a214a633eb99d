pub mod config;
pub mod contracts;
pub mod drain;
pub mod messaging;
