//! Reading time estimate for Markdown bodies

use lazy_static::lazy_static;
use regex::Regex;

/// Average reading speed
const WORDS_PER_MINUTE: f64 = 200.0;

lazy_static! {
    /// Scripts written without spaces; every character counts as a word
    static ref CJK_CHAR: Regex =
        Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]").unwrap();
}

/// Count words the way readers perceive them across Latin and CJK text
pub fn count_words(text: &str) -> usize {
    let cjk = CJK_CHAR.find_iter(text).count();
    let rest = CJK_CHAR.replace_all(text, " ");
    let words = rest
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count();
    cjk + words
}

/// Minutes needed to read `text`, rounded up
pub fn reading_minutes(text: &str) -> u64 {
    let minutes = count_words(text) as f64 / WORDS_PER_MINUTE;
    // round to hundredths first so 1.001 reads as one minute
    ((minutes * 100.0).round() / 100.0).ceil() as u64
}

/// Display string such as "3 min read"
pub fn reading_time(text: &str) -> String {
    format!("{} min read", reading_minutes(text))
}
