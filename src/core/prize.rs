use regex::Regex;
use std::sync::LazyLock;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").unwrap());

pub fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").into_owned()
}

/// Numeric sort key of a free-text prize description: the first run of digits
/// (thousands separators allowed) after markup is removed. Missing, empty,
/// number-free or overflowing text yields 0.
pub fn extract_prize_value(text: Option<&str>) -> u64 {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return 0;
    };

    let plain = strip_markup(text);
    AMOUNT
        .find(&plain)
        .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok())
        .unwrap_or(0)
}
