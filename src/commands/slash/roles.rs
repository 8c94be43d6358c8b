//! # Role Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_role_command("addrole", "Give yourself a role"),
        create_role_command("removerole", "Take a role off yourself"),
    ]
}

fn create_role_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(name)
        .description(description)
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("role")
                .description("The role")
                .kind(CommandOptionType::Role)
                .required(true)
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role_commands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].0.get("name").unwrap().as_str(), Some("addrole"));
        assert_eq!(commands[1].0.get("name").unwrap().as_str(), Some("removerole"));
        assert_eq!(
            commands[0].0.get("dm_permission").unwrap().as_bool(),
            Some(false)
        );
    }
}
