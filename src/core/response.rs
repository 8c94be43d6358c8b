//! Discord message sizing utilities
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Code-block aware chunking for music month listings
//! - 1.0.0: Line-aware chunking

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

const FENCE: &str = "```";

/// Chunk text into pieces no longer than `max_size` bytes (UTF-8 safe, line-aware)
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if !current.is_empty() && current.len() + line.len() + 1 > max_size {
            chunks.push(std::mem::take(&mut current));
        }
        if line.len() > max_size {
            chunks.extend(chunk_long_line(line, max_size));
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn chunk_long_line(line: &str, max_size: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > max_size && !current.is_empty() {
            result.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Chunk text for message content (2000 character limit)
/// Render `header` followed by `body` inside a code block, split into
/// messages that each fit the limit and each carry their own fences.
pub fn code_block_messages(header: &str, body: &str) -> Vec<String> {
    // Two fences and the newlines around the content
    let overhead = FENCE.len() * 2 + 2;
    let body = body.trim_end();

    let mut messages = Vec::new();
    let room = if header.len() + overhead < MESSAGE_LIMIT {
        MESSAGE_LIMIT - header.len() - overhead
    } else {
        messages.push(chunk_long_line(header, MESSAGE_LIMIT).remove(0));
        MESSAGE_LIMIT - overhead
    };

    for part in chunk_text(body, room) {
        if messages.is_empty() {
            messages.push(format!("{header}{FENCE}\n{part}\n{FENCE}"));
        } else {
            messages.push(format!("{FENCE}\n{part}\n{FENCE}"));
        }
    }
    messages
}
