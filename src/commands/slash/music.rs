//! # Music Month Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_musicsetup_command(),
        create_musicmonth_command(),
        create_musicprompt_command(),
    ]
}

fn create_musicsetup_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("musicsetup")
        .description("Load a music month from a JSON file (bot owner only)")
        .create_option(|option| {
            option
                .name("file")
                .description("URL of the .json file describing the month")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(2000)
        });
    command
}

fn create_musicmonth_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("musicmonth")
        .description("Show the current or next music month");
    command
}

fn create_musicprompt_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("musicprompt")
        .description("Show a day's prompt for the current music month")
        .create_option(|option| {
            option
                .name("day")
                .description("Day of the month (defaults to today)")
                .kind(CommandOptionType::Integer)
                .required(false)
                .min_int_value(1)
                .max_int_value(31)
        });
    command
}
