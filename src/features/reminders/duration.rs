//! Reminder offset parsing
//!
//! Offsets look like `5d3h30m`: an optional whole day count terminated by `d`,
//! followed by a plain duration made of `<number><unit>` tokens.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Split day prefix from the plain duration grammar, fractional values, sub-second units
//! - 1.0.0: Initial single-pass parser

use std::time::Duration;

use crate::core::BotError;

/// Example shown to users whenever an offset fails to parse
pub const OFFSET_EXAMPLE: &str = "5d3h30m";

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Largest representable offset, matching a signed 64-bit nanosecond count
const MAX_NANOS: u128 = i64::MAX as u128;

/// Parse a user-entered offset into a total duration
///
/// Everything before the first `d` must be a non-negative integer day count
/// and everything after it must be a plain duration. Without a `d` the whole
/// input is a plain duration. A zero total is accepted here; surrounding
/// whitespace is not.
pub fn parse_offset(input: &str) -> Result<Duration, BotError> {
    let Some((days, rest)) = input.split_once('d') else {
        return parse_plain(input);
    };

    if days.is_empty() || !days.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BotError::InvalidFormat(format!(
            "day count '{days}' is not a number"
        )));
    }
    let days: u64 = days
        .parse()
        .map_err(|_| BotError::InvalidFormat(format!("day count '{days}' is too large")))?;

    let remainder = parse_plain(rest)?;
    let total = days
        .checked_mul(SECS_PER_DAY)
        .map(Duration::from_secs)
        .and_then(|d| d.checked_add(remainder))
        .filter(|d| d.as_nanos() <= MAX_NANOS)
        .ok_or_else(|| BotError::InvalidFormat("offset is too large".to_string()))?;

    Ok(total)
}

/// Parse a plain duration such as `3h30m`, `90m`, `1.5h` or `250ms`
pub fn parse_plain(input: &str) -> Result<Duration, BotError> {
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        return Err(BotError::InvalidFormat("empty duration".to_string()));
    }

    let invalid = || BotError::InvalidFormat(format!("invalid duration '{input}'"));
    let mut rest = input;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let int_part = &rest[..int_end];
        rest = &rest[int_end..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_end];
            rest = &after_dot[frac_end..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let scale = unit_nanos(unit).ok_or_else(|| {
            if unit.is_empty() {
                BotError::InvalidFormat(format!("missing unit in duration '{input}'"))
            } else {
                BotError::InvalidFormat(format!("unknown unit '{unit}' in duration '{input}'"))
            }
        })?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut value = whole.checked_mul(scale).ok_or_else(invalid)?;

        // Digits beyond nanosecond precision cannot contribute
        let frac_digits = &frac_part[..frac_part.len().min(18)];
        if !frac_digits.is_empty() {
            let numerator: u128 = frac_digits.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(frac_digits.len() as u32);
            value += numerator * scale / denominator;
        }

        total = total.checked_add(value).ok_or_else(invalid)?;
        if total > MAX_NANOS {
            return Err(BotError::InvalidFormat(format!(
                "duration '{input}' is too large"
            )));
        }
    }

    Ok(Duration::new(
        (total / NANOS_PER_SEC) as u64,
        (total % NANOS_PER_SEC) as u32,
    ))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(60 * 60 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Render an offset in the `[<days>d]<duration>` form accepted by [`parse_offset`]
pub fn format_offset(days: u64, remainder: Duration) -> String {
    let plain = format_plain(remainder);
    if days > 0 {
        format!("{days}d{plain}")
    } else {
        plain
    }
}

fn format_plain(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let nanos = duration.subsec_nanos();

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    if nanos > 0 {
        out.push_str(&format!("{nanos}ns"));
    }
    out
}

/// Format a duration into a human-readable string like "5 days 3 hours"
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let plural = |n: u64| if n == 1 { "" } else { "s" };

    if seconds < 60 {
        format!("{} second{}", seconds, plural(seconds))
    } else if seconds < 3600 {
        let mins = seconds / 60;
        format!("{} minute{}", mins, plural(mins))
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!(
                "{} hour{} {} minute{}",
                hours,
                plural(hours),
                mins,
                plural(mins)
            )
        } else {
            format!("{} hour{}", hours, plural(hours))
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!(
                "{} day{} {} hour{}",
                days,
                plural(days),
                hours,
                plural(hours)
            )
        } else {
            format!("{} day{}", days, plural(days))
        }
    }
}
