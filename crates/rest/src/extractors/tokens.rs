//! Delimited token parsing for search parameters.
//!
//! Search and education parameters arrive as comma-separated lists where a
//! double-quoted segment may itself contain the delimiter ("hog, wild" is
//! one token). There is no escaping mechanism beyond quoting.

/// Splits `input` on `delimiter`, honoring double-quoted segments.
///
/// Each token is trimmed of surrounding whitespace and empty tokens are
/// dropped, so `"a,,b"` and `" a , b "` both yield two tokens. Quote
/// characters are consumed, never emitted. An unbalanced quote swallows the
/// rest of the input into the final token.
pub fn parse_delimited(input: &str, delimiter: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            push_token(&mut tokens, &mut current);
        } else {
            current.push(ch);
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}
