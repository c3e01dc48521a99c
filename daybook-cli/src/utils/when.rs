//! Parsing of user-typed dates, times and durations.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Length of an event when no end is given
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Full day and month names for the short forms fuzzydate does not know.
fn expand_word(word: &str) -> &str {
    match word {
        "mon" => "monday",
        "tue" | "tues" => "tuesday",
        "wed" => "wednesday",
        "thu" | "thur" | "thurs" => "thursday",
        "fri" => "friday",
        "sat" => "saturday",
        "sun" => "sunday",
        "jan" => "january",
        "feb" => "february",
        "mar" => "march",
        "apr" => "april",
        "jun" => "june",
        "jul" => "july",
        "aug" => "august",
        "sep" | "sept" => "september",
        "oct" => "october",
        "nov" => "november",
        "dec" => "december",
        other => other,
    }
}

fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(expand_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the input names a time of day rather than just a date.
fn mentions_time(input: &str) -> bool {
    let lower = input.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    words.iter().enumerate().any(|(i, word)| {
        let digits_then = |suffix: &str| {
            word.strip_suffix(suffix)
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        };
        let after_number = i > 0 && words[i - 1].chars().all(|c| c.is_ascii_digit());
        let clock = word.split_once(':').is_some_and(|(h, m)| {
            h.ends_with(|c: char| c.is_ascii_digit()) && m.starts_with(|c: char| c.is_ascii_digit())
        });
        let at_number = *word == "at"
            && words
                .get(i + 1)
                .is_some_and(|next| next.starts_with(|c: char| c.is_ascii_digit()));

        matches!(*word, "noon" | "midnight")
            || digits_then("am")
            || digits_then("pm")
            || (matches!(*word, "am" | "pm") && after_number)
            || clock
            || at_number
    })
}

/// A day, as `YYYY-MM-DD` or in words ("tomorrow", "next friday").
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date);
    }

    fuzzydate::parse(&normalize(input))
        .map(|dt| dt.date())
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{input}\""))
}

/// A start time, as `YYYY-MM-DD HH:MM` or in words ("sat 3pm").
/// A bare date means the start of that day.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    let dt = fuzzydate::parse(&normalize(input))
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{input}\""))?;

    if mentions_time(input) {
        Ok(dt)
    } else {
        Ok(dt.date().and_time(NaiveTime::MIN))
    }
}

/// `start` moved forward by a humantime duration such as "45m" or "2h".
pub fn apply_duration(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    let duration = humantime::parse_duration(input.trim())
        .map_err(|e| anyhow::anyhow!("Could not parse duration \"{input}\": {e}"))?;
    let duration = Duration::from_std(duration).context("Duration too large")?;
    start
        .checked_add_signed(duration)
        .context("Duration too large")
}

/// An end given either as a duration or as a date/time ("until 5pm").
pub fn parse_end(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    if let Ok(end) = apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .trim()
        .strip_prefix("until ")
        .or_else(|| input.trim().strip_prefix("to "))
        .unwrap_or(input);
    parse_datetime(cleaned)
}

pub fn default_end(start: NaiveDateTime) -> NaiveDateTime {
    start + Duration::minutes(DEFAULT_DURATION_MINUTES)
}
