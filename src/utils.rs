// src/utils.rs
/// Maximum number of characters handed to the extraction prompt.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Normalize scraped page text for prompting: drop noise characters,
/// collapse whitespace runs and bound the length to `MAX_PROMPT_CHARS`.
pub fn clean_text(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .map(|c| if is_noise_char(c) { ' ' } else { c })
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_PROMPT_CHARS)
}

/// Truncate a string to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn is_noise_char(c: char) -> bool {
    if c.is_alphanumeric() || c.is_whitespace() {
        return false;
    }
    // Keep punctuation that carries meaning in job descriptions
    !matches!(
        c,
        '.' | ','
            | ';'
            | ':'
            | '('
            | ')'
            | '/'
            | '&'
            | '+'
            | '#'
            | '\''
            | '"'
            | '-'
            | '%'
            | '!'
            | '?'
    )
}
