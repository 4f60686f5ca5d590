// Pure helpers for turning card fields into display text
use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// Accent colors a card can be tinted with
pub const CARD_COLORS: [&str; 8] = [
    "#6366f1", "#f59e0b", "#10b981", "#ef4444", "#ec4899", "#8b5cf6", "#06b6d4", "#f97316",
];

/// Pick a stable accent color for a seed. Negative seeds map like their absolute value.
pub fn pick_color(seed: i64) -> &'static str {
    CARD_COLORS[(seed.unsigned_abs() % CARD_COLORS.len() as u64) as usize]
}

/// Render a publish timestamp as `YYYY-MM-DD HH:MM` in local time.
///
/// Empty input yields `fallback`. Input we can't parse comes back untouched
/// rather than being mangled.
pub fn format_time(iso: &str, fallback: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return fallback.to_string();
    }

    match parse_timestamp(iso) {
        Some(local) => local.format("%Y-%m-%d %H:%M").to_string(),
        None => iso.to_string(),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Local));
    }
    // Offset-less timestamps are wall-clock time
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local.from_local_datetime(&naive).earliest();
    }
    // Bare dates are midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(&Local));
    }
    None
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

fn whitespace_pattern() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Drop markup from feed text, decode the common entities and squeeze
/// whitespace so the result fits on terminal lines.
pub fn strip_html(html: &str) -> String {
    let text = tag_pattern().replace_all(html, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        // last, so "&amp;lt;" stays "&lt;"
        .replace("&amp;", "&");

    whitespace_pattern().replace_all(&text, " ").trim().to_string()
}

/// Cut `text` to at most `len` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, len: usize) -> String {
    if text.chars().count() <= len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(len).collect();
    out.push('…');
    out
}

/// Split a card's `image_palette` ("#aaa, #bbb") into its colors
pub fn palette_from_text(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Parse `#rrggbb` (or `#rgb`) into its channels
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    match digits.len() {
        6 => {
            let value = u32::from_str_radix(digits, 16).ok()?;
            Some((
                ((value >> 16) & 0xFF) as u8,
                ((value >> 8) & 0xFF) as u8,
                (value & 0xFF) as u8,
            ))
        }
        3 => {
            let mut channels = digits
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_color_wraps_and_ignores_sign() {
        assert_eq!(pick_color(0), "#6366f1");
        assert_eq!(pick_color(9), "#f59e0b");
        assert_eq!(pick_color(-9), pick_color(9));
        assert_eq!(pick_color(i64::MIN), CARD_COLORS[0]);
    }

    #[test]
    fn test_format_time_empty_uses_fallback() {
        assert_eq!(format_time("", "Unknown"), "Unknown");
        assert_eq!(format_time("   ", "未知时间"), "未知时间");
    }

    #[test]
    fn test_format_time_naive_is_wall_clock() {
        assert_eq!(format_time("2024-03-05T07:08:09", "?"), "2024-03-05 07:08");
    }

    #[test]
    fn test_format_time_with_offset_converts_to_local() {
        let expected = DateTime::parse_from_rfc3339("2024-03-05T07:08:09Z")
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(format_time("2024-03-05T07:08:09Z", "?"), expected);
    }

    #[test]
    fn test_format_time_garbage_passes_through() {
        assert_eq!(format_time("sometime last week", "?"), "sometime last week");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b></p>\n<a href=\"x\">link</a>"),
            "Hello world link"
        );
        assert_eq!(strip_html("Tom &amp; Jerry &lt;3"), "Tom & Jerry <3");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("世界之窗新闻", 2), "世界…");
    }

    #[test]
    fn test_palette_from_text() {
        assert_eq!(
            palette_from_text("#007AFF, #FF2D55,, "),
            vec!["#007AFF", "#FF2D55"]
        );
        assert!(palette_from_text("").is_empty());
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#6366f1"), Some((0x63, 0x66, 0xf1)));
        assert_eq!(hex_to_rgb("#fff"), Some((255, 255, 255)));
        assert_eq!(hex_to_rgb("6366f1"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }
}
