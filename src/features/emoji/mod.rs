//! # Emoji Feature
//!
//! Turns a custom emoji mention into its full-size CDN image URL.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use regex::Regex;
use std::sync::OnceLock;

const EMOJI_CDN: &str = "https://cdn.discordapp.com/emojis/";

/// The emoji posted by `/bogart`
pub const BOGART_URL: &str = "https://cdn.discordapp.com/emojis/721104351220727859.png?v=1";

fn emoji_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(a?):\w+:(\d+)>").expect("emoji pattern is a valid regex")
    })
}

/// CDN URL for the first custom emoji (`<:name:id>` or `<a:name:id>`) in `input`
///
/// Animated emoji resolve to a `.gif`, static ones to a `.png`.
pub fn emoji_url(input: &str) -> Option<String> {
    let caps = emoji_pattern().captures(input)?;
    let suffix = if caps[1].is_empty() {
        ".png?v=1"
    } else {
        ".gif?v=1"
    };
    Some(format!("{EMOJI_CDN}{}{suffix}", &caps[2]))
}
