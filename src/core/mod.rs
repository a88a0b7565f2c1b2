pub mod config;
pub mod dice;
pub mod error;
pub mod types;
