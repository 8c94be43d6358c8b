//! # Reminder Command
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Offsets accept fractional and sub-second units
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_reminder_command()]
}

fn create_reminder_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("reminder")
        .description("Have me DM you a reminder later")
        .create_option(|option| {
            option
                .name("reminder")
                .description("What you want to be reminded about")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(1500)
        })
        .create_option(|option| {
            option
                .name("when")
                .description("How long from now, like 5d3h30m")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(100)
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reminder_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let name = commands[0].0.get("name").unwrap().as_str().unwrap();
        assert_eq!(name, "reminder");

        let options = commands[0].0.get("options").unwrap().as_array().unwrap();
        let option_names: Vec<&str> = options
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(option_names, vec!["reminder", "when"]);
    }
}
