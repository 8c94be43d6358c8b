//! # Core Module
//!
//! Configuration, error taxonomy and Discord message utilities.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Add error module with the reminder/music month taxonomy
//! - 1.1.0: Add response module with Discord message chunking utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

pub use config::Config;
pub use error::BotError;
pub use response::code_block_messages;
