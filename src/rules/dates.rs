//! Due-date heuristics.
//!
//! Narrow pattern matching over a handful of phrases ("today", "tomorrow",
//! "by friday", "next monday", `2024-06-20`). Not a natural-language date
//! parser.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;

static DUE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(today|tonight)|(tomorrow)|(?:(?:by|on|next|this|until|before)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)|(\d{4}-\d{2}-\d{2}))\b",
    )
    .expect("due date pattern is valid")
});

static DATE_LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:today|tonight|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday|deadline|due|until|before|next (?:week|month)|end of (?:the )?(?:day|week|month)|eod|eow|by\s+(?:noon|midnight|then|next|the end|\d+)|\d{4}-\d{2}-\d{2})\b",
    )
    .expect("date language pattern is valid")
});

/// Resolve the first date phrase in `content` to a calendar date.
///
/// Phrases are tried in order of appearance; the first one that resolves
/// wins. Weekdays always land strictly after `today`.
pub fn extract_due_date(content: &str, today: NaiveDate) -> Option<NaiveDate> {
    DUE_DATE_RE.captures_iter(content).find_map(|caps| {
        if caps.get(1).is_some() {
            Some(today)
        } else if caps.get(2).is_some() {
            today.checked_add_days(Days::new(1))
        } else if let Some(day) = caps.get(3) {
            parse_weekday(day.as_str()).and_then(|target| next_weekday(today, target))
        } else {
            caps.get(4)
                .and_then(|iso| NaiveDate::parse_from_str(iso.as_str(), "%Y-%m-%d").ok())
        }
    })
}

/// Whether `content` talks about a date or deadline at all.
///
/// Broader than [`extract_due_date`]: "deadline next week" mentions a date
/// but does not resolve to one.
pub fn mentions_date(content: &str) -> bool {
    DATE_LANGUAGE_RE.is_match(content)
}

/// Next occurrence of `target` strictly after `today`.
///
/// A same-day match rolls a full week ahead.
pub fn next_weekday(today: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let ahead = match (wanted + 7 - current) % 7 {
        0 => 7,
        n => n,
    };
    today.checked_add_days(Days::new(u64::from(ahead)))
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    name.to_ascii_lowercase().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-10 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_resolves_to_evaluation_date() {
        assert_eq!(extract_due_date("do it today", monday()), Some(monday()));
    }

    #[test]
    fn tomorrow_is_next_calendar_day() {
        assert_eq!(
            extract_due_date("Buy milk tomorrow", monday()),
            Some(date(2024, 6, 11))
        );
        let new_years_eve = date(2024, 12, 31);
        assert_eq!(
            extract_due_date("tomorrow", new_years_eve),
            Some(date(2025, 1, 1))
        );
    }

    #[test]
    fn by_friday_on_monday_is_same_week() {
        assert_eq!(
            extract_due_date("By Friday finish report", monday()),
            Some(date(2024, 6, 14))
        );
    }

    #[test]
    fn same_weekday_rolls_a_full_week() {
        assert_eq!(
            extract_due_date("next monday standup notes", monday()),
            Some(date(2024, 6, 17))
        );
        assert_eq!(
            extract_due_date("monday", monday()),
            Some(date(2024, 6, 17))
        );
    }

    #[test]
    fn weekday_earlier_in_week_wraps_forward() {
        // Sunday is six days after Monday.
        assert_eq!(
            extract_due_date("on sunday", monday()),
            Some(date(2024, 6, 16))
        );
    }

    #[test]
    fn earliest_phrase_wins() {
        assert_eq!(
            extract_due_date("tomorrow or maybe friday", monday()),
            Some(date(2024, 6, 11))
        );
        assert_eq!(
            extract_due_date("friday, not tomorrow", monday()),
            Some(date(2024, 6, 14))
        );
    }

    #[test]
    fn iso_dates_are_literal() {
        assert_eq!(
            extract_due_date("submit by 2024-07-01", monday()),
            Some(date(2024, 7, 1))
        );
    }

    #[test]
    fn invalid_iso_date_falls_through() {
        assert_eq!(extract_due_date("ref 2024-13-45", monday()), None);
        assert_eq!(
            extract_due_date("ref 2024-13-45 due tomorrow", monday()),
            Some(date(2024, 6, 11))
        );
    }

    #[test]
    fn no_date_phrase_yields_none() {
        assert_eq!(extract_due_date("deadline next week", monday()), None);
        assert_eq!(extract_due_date("", monday()), None);
        assert_eq!(extract_due_date("todays", monday()), None);
    }

    #[test]
    fn mentions_date_is_broader_than_extraction() {
        assert!(mentions_date("deadline next week"));
        assert!(mentions_date("By Friday finish report"));
        assert!(!mentions_date("buy milk"));
        assert!(!mentions_date("read the book by Tolkien"));
    }

    #[test]
    fn cutoff_words_mention_a_date() {
        assert!(mentions_date("finish report before noon"));
        assert!(mentions_date("hold the package until further notice"));
        assert!(mentions_date("submit by end of month"));
        assert!(mentions_date("pay rent by the end of the month"));
        assert!(mentions_date("call back by 17:00"));
        assert!(!mentions_date("written by hand"));
        assert_eq!(extract_due_date("submit by end of month", monday()), None);
    }
}
