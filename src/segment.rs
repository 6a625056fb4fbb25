use fancy_regex::Regex;
use lazy_static::lazy_static;

use crate::error::Result;

/// Punctuation marks, the `--` dash and single whitespace characters.
/// Every match is itself a candidate piece.
const SPLIT_PATTERN: &str = r#"[,.:;?_!"()']|--|\s"#;

lazy_static! {
    static ref SPLIT_COMPILED_PATTERN: Regex = Regex::new(SPLIT_PATTERN).unwrap();
}

/// Split `text` into trimmed, non-empty pieces in left-to-right order,
/// keeping the delimiters as pieces of their own.
pub fn segment(text: &str) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in SPLIT_COMPILED_PATTERN.find_iter(text) {
        let m = m?;
        push_trimmed(&mut pieces, &text[last..m.start()]);
        push_trimmed(&mut pieces, m.as_str());
        last = m.end();
    }
    push_trimmed(&mut pieces, &text[last..]);
    Ok(pieces)
}

fn push_trimmed(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world() {
        assert_eq!(
            segment("Hello, world!").unwrap(),
            vec!["Hello", ",", "world", "!"]
        );
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(segment("").unwrap().is_empty());
        assert!(segment("   \t\n ").unwrap().is_empty());
    }

    #[test]
    fn test_dash_and_quotes() {
        assert_eq!(
            segment("wait--\"what?\" (she said)").unwrap(),
            vec![
                "wait", "--", "\"", "what", "?", "\"", "(", "she", "said", ")"
            ]
        );
    }

    #[test]
    fn test_single_hyphen_is_not_a_delimiter() {
        assert_eq!(segment("well-known").unwrap(), vec!["well-known"]);
        assert_eq!(segment("a---b").unwrap(), vec!["a", "--", "-b"]);
    }

    #[test]
    fn test_apostrophe_and_underscore() {
        assert_eq!(
            segment("don't _stop_").unwrap(),
            vec!["don", "'", "t", "_", "stop", "_"]
        );
    }

    #[test]
    fn test_idempotent_on_atomic_tokens() {
        let first = segment("It was, in fact; the end: done.").unwrap();
        let again: Vec<String> = first
            .iter()
            .flat_map(|piece| segment(piece).unwrap())
            .collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_special_markers_survive() {
        assert_eq!(segment("<|BOS|>").unwrap(), vec!["<|BOS|>"]);
    }
}
