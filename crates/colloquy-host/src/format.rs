//! Text helpers for list rows

use chrono::{DateTime, Utc};
use colloquy_core::Conversation;
use unicode_segmentation::UnicodeSegmentation;

/// Shown for conversations that were never titled
pub const UNTITLED: &str = "New conversation";

pub fn display_title(conversation: &Conversation) -> &str {
    conversation
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED)
}

/// Cut `text` to at most `max` user-perceived characters
pub fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = graphemes[..keep].concat();
    out.push('…');
    out
}

/// Short age label such as "5m ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_display_title_fallback() {
        let mut c = Conversation::new("", "chat");
        assert_eq!(display_title(&c), UNTITLED);

        c.title = Some("Recon notes".to_string());
        assert_eq!(display_title(&c), "Recon notes");
    }

    #[test]
    fn test_truncate_counts_graphemes() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("👩‍👩‍👧e\u{301}xyz", 3), "👩‍👩‍👧e\u{301}…");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();

        assert_eq!(relative_time(now - Duration::seconds(5), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(30), now), "2024-04-20");
    }
}
