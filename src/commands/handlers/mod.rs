//! Per-command handler implementations
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Add MusicHandler (musicsetup, musicmonth, musicprompt)
//! - 1.1.0: Add RoleHandler (addrole, removerole)
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod music;
pub mod remind;
pub mod roles;
pub mod utility;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
///
/// Returns a vector of handlers ready to be registered with CommandRegistry.
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(roles::RoleHandler),
        Arc::new(remind::RemindHandler),
        Arc::new(music::MusicHandler),
    ]
}
