//! Display formatting helpers

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Characters of content shown in a list preview
pub const PREVIEW_LEN: usize = 150;

/// Relative date for an entry timestamp (microseconds since the epoch)
///
/// Whole elapsed days decide the wording: 0 is "Today at HH:MM", 1 is
/// "Yesterday", under 7 is "N days ago", anything older is the date.
/// Timestamps in the future count as today.
pub fn format_relative<Tz>(timestamp_micros: u64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(date) = i64::try_from(timestamp_micros)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_micros)
    else {
        return "Unknown date".to_string();
    };
    let date = date.with_timezone(&now.timezone());

    match now.clone().signed_duration_since(date.clone()).num_days() {
        days if days <= 0 => format!("Today at {}", date.format("%H:%M")),
        1 => "Yesterday".to_string(),
        days if days < 7 => format!("{} days ago", days),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

/// [`format_relative`] against the local clock
pub fn format_relative_now(timestamp_micros: u64) -> String {
    format_relative(timestamp_micros, &Local::now())
}

/// Cut `text` to `max_chars` characters, appending "..." when shortened
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Escape text for inclusion in HTML markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn micros(dt: DateTime<Utc>) -> u64 {
        dt.timestamp_micros() as u64
    }

    #[test]
    fn test_relative_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let ts = micros(Utc.with_ymd_and_hms(2024, 3, 10, 9, 5, 0).unwrap());
        assert_eq!(format_relative(ts, &now), "Today at 09:05");
    }

    #[test]
    fn test_relative_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();

        let yesterday = micros(now - Duration::hours(30));
        assert_eq!(format_relative(yesterday, &now), "Yesterday");

        let three = micros(now - Duration::days(3) - Duration::hours(1));
        assert_eq!(format_relative(three, &now), "3 days ago");

        let old = micros(Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap());
        assert_eq!(format_relative(old, &now), "Jan 5, 2024");
    }

    #[test]
    fn test_relative_future_is_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let ts = micros(now + Duration::days(2));
        assert!(format_relative(ts, &now).starts_with("Today at"));
    }

    #[test]
    fn test_relative_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        assert_eq!(format_relative(u64::MAX, &now), "Unknown date");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 150), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");

        let long = "x".repeat(PREVIEW_LEN + 10);
        let cut = truncate(&long, PREVIEW_LEN);
        assert_eq!(cut.len(), PREVIEW_LEN + 3);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("日記日記", 2), "日記...");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
