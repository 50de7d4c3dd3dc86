pub mod config;
pub mod input;
