//! # Utility Commands
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add /suggestion
//! - 1.0.0: Initial birdass, bogart and bigemoji

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut birdass = CreateApplicationCommand::default();
    birdass.name("birdass").description("Birdass");

    let mut bogart = CreateApplicationCommand::default();
    bogart.name("bogart").description("Bogart");

    let mut bigemoji = CreateApplicationCommand::default();
    bigemoji
        .name("bigemoji")
        .description("Post a custom emoji at full size")
        .create_option(|option| {
            option
                .name("emoji")
                .description("A custom emoji")
                .kind(CommandOptionType::String)
                .required(true)
        });

    let mut suggestion = CreateApplicationCommand::default();
    suggestion
        .name("suggestion")
        .description("Suggest something for the bot")
        .create_option(|option| {
            option
                .name("suggestion")
                .description("Your suggestion")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(1500)
        });

    vec![birdass, bogart, bigemoji, suggestion]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_utility_commands() {
        let names: Vec<String> = create_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["birdass", "bogart", "bigemoji", "suggestion"]);
    }
}
