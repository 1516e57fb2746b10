//! Text-level clean-up applied around the byte encoder: markup tags, entity
//! references and stray `%` signs.

use std::sync::LazyLock;

use regex::bytes::Regex;

// `(?-u)` so both patterns match arbitrary bytes, not only valid UTF-8.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s-u)<[^\s>][^>]*(?:>|$)").expect("invalid tag pattern"));

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)&.+?;").expect("invalid entity pattern"));

/// Removes `<...>` tags, including an unterminated trailing `<...`. A `<`
/// followed by whitespace is text, not a tag, and is kept.
pub fn strip_tags(input: &[u8]) -> Vec<u8> {
    TAG.replace_all(input, &b""[..]).into_owned()
}

/// Removes `&...;` entity references (shortest match, single line).
pub fn strip_entities(input: &[u8]) -> Vec<u8> {
    ENTITY.replace_all(input, &b""[..]).into_owned()
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    /// A `%` followed by two hex digits, kept verbatim.
    Encoded(&'a [u8]),
    Text(&'a [u8]),
}

fn tokenize(input: &[u8]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;
    while i < input.len() {
        let is_pair = input.get(i) == Some(&b'%')
            && input.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && input.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if !is_pair {
            i += 1;
            continue;
        }
        if let Some(text) = input.get(text_start..i).filter(|t| !t.is_empty()) {
            tokens.push(Token::Text(text));
        }
        if let Some(pair) = input.get(i..i + 3) {
            tokens.push(Token::Encoded(pair));
        }
        i += 3;
        text_start = i;
    }
    if let Some(text) = input.get(text_start..).filter(|t| !t.is_empty()) {
        tokens.push(Token::Text(text));
    }
    tokens
}

/// Drops every `%` that does not start a `%XX` hex pair; existing pairs
/// survive untouched.
pub fn strip_stray_percent(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for token in tokenize(input) {
        match token {
            Token::Encoded(pair) => out.extend_from_slice(pair),
            Token::Text(text) => out.extend(text.iter().copied().filter(|&b| b != b'%')),
        }
    }
    out
}
