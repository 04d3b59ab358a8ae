// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long replies to the Telegram message size limit.
//!
//! Chunks break on line boundaries where possible so formatting survives;
//! a single line longer than the limit is hard-sliced at char boundaries.
//! Concatenating the chunks reproduces the input exactly.

/// Splits `text` into chunks of at most `limit` characters.
///
/// Empty input yields no chunks. `limit` is measured in `char`s, matching
/// how Telegram counts message length.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    assert!(limit > 0, "chunk limit must be positive");

    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    // split_inclusive keeps the trailing '\n' with each line, so joining
    // the chunks loses nothing.
    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            // Oversized single line: hard-slice at char boundaries.
            let mut rest = line;
            while !rest.is_empty() {
                let take = limit - current_len;
                let cut = rest
                    .char_indices()
                    .nth(take)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                current.push_str(&rest[..cut]);
                current_len += rest[..cut].chars().count();
                rest = &rest[cut..];
                if current_len == limit {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hola", 4096), vec!["hola"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split_message("", 4096).is_empty());
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "aaa\nbbb\nccc\nddd";
        let chunks = split_message(text, 8);
        assert_eq!(chunks, vec!["aaa\nbbb\n", "ccc\nddd"]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        let text = "línea uno\nlínea dos\n\nlínea cuatro con más texto\ncinco";
        let chunks = split_message(text, 12);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12);
        }
    }

    #[test]
    fn oversized_line_is_hard_sliced() {
        let text = "x".repeat(10);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks, vec!["xxxx", "xxxx", "xx"]);
    }

    #[test]
    fn hard_slice_respects_char_boundaries() {
        // Multibyte chars must never be cut mid-encoding.
        let text = "ñ".repeat(10);
        let chunks = split_message(&text, 3);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 3);
        }
    }

    #[test]
    fn mixed_lines_and_oversized_line() {
        let text = "ab\ncdefghij\nkl";
        let chunks = split_message(text, 5);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn exactly_at_limit_is_one_chunk() {
        let text = "x".repeat(4096);
        assert_eq!(split_message(&text, 4096).len(), 1);
    }
}
