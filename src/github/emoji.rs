//! Emoji for GitHub Discussions categories

/// Shown for categories nothing else matches
pub const DEFAULT_EMOJI: &str = "💬";

/// Known categories keyed by lowercased category name or emoji shortcode
const CATEGORY_EMOJI: &[(&str, &str)] = &[
    // GitHub's default discussion categories
    ("announcements", "📣"),
    ("general", "💬"),
    ("ideas", "💡"),
    ("q&a", "🙏"),
    ("show and tell", "🙌"),
    // shortcode spellings
    ("announcement", "📣"),
    ("speech_balloon", "💬"),
    ("question", "🙏"),
    ("idea", "💡"),
    ("show_and_tell", "🙌"),
    ("poll", "📊"),
    ("help_wanted", "🤝"),
];

fn lookup(key: &str) -> Option<&'static str> {
    CATEGORY_EMOJI
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, emoji)| *emoji)
}

/// Pick the emoji for a discussion category.
///
/// The raw shortcode (colons stripped) is tried first, then the category
/// name; both default to `general` when missing. A missing shortcode
/// therefore always yields 💬 and the name is only consulted for shortcodes
/// the table does not know.
pub fn category_emoji(raw_emoji: Option<&str>, category_name: Option<&str>) -> &'static str {
    let shortcode = raw_emoji
        .map(|e| e.replace(':', "").to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "general".to_string());
    let name = category_name
        .map(str::to_lowercase)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "general".to_string());

    lookup(&shortcode)
        .or_else(|| lookup(&name))
        .unwrap_or(DEFAULT_EMOJI)
}
