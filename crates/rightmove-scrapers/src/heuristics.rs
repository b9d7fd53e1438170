//! Best-effort parsing of the loosely formatted text on listing cards.
//!
//! Every parser degrades to a sentinel (`None` for dates and agents,
//! [`PRICE_NOT_SET`] for prices) instead of failing.

use chrono::{Local, NaiveDate};
use regex::Regex;
use rightmove_core::PRICE_NOT_SET;
use std::sync::OnceLock;

const ADDED: &str = "Added";
const ADDED_ON: &str = "Added on ";
const REDUCED: &str = "Reduced";
const REDUCED_ON: &str = "Reduced on ";
const AGENT_MARKER: &str = "by ";
const DATE_WIDTH: usize = 10;
const DATE_FORMAT: &str = "%d/%m/%Y";

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9,]+").expect("price pattern is valid"))
}

/// Trims surrounding `\r`, `\n` and `\t`, then whitespace. Empty results
/// become `None`.
pub fn trim_up(text: &str) -> Option<String> {
    let trimmed = text.trim_matches(|c| matches!(c, '\r' | '\n' | '\t')).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// ASCII case-insensitive substring search. Byte offsets stay valid for
/// the original text since ASCII folding never changes lengths.
fn find_ignore_case(text: &str, needle: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(&needle.to_ascii_lowercase())
}

fn relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if find_ignore_case(text, "yesterday").is_some() {
        today.pred_opt()
    } else if find_ignore_case(text, "today").is_some() {
        Some(today)
    } else {
        None
    }
}

/// Rules, in order: keyword present, relative word, fixed-width date
/// after "<keyword> on ", otherwise unknown.
fn parse_keyword_date(
    text: &str,
    keyword: &str,
    phrase: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let index = find_ignore_case(text, keyword)?;

    if let Some(date) = relative_date(text, today) {
        return Some(date);
    }

    let start = index + phrase.len();
    let candidate = text.get(start..start + DATE_WIDTH)?;
    NaiveDate::parse_from_str(candidate.trim(), DATE_FORMAT).ok()
}

pub fn parse_date_added(text: &str) -> Option<NaiveDate> {
    parse_date_added_on(text, Local::now().date_naive())
}

/// [`parse_date_added`] with an explicit reference day for "today" and
/// "yesterday".
pub fn parse_date_added_on(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_keyword_date(text, ADDED, ADDED_ON, today)
}

pub fn parse_date_reduced(text: &str) -> Option<NaiveDate> {
    parse_date_reduced_on(text, Local::now().date_naive())
}

pub fn parse_date_reduced_on(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_keyword_date(text, REDUCED, REDUCED_ON, today)
}

/// Everything after the first "by ", trimmed.
pub fn parse_agent(text: &str) -> Option<String> {
    let index = find_ignore_case(text, AGENT_MARKER)?;
    trim_up(&text[index + AGENT_MARKER.len()..])
}

/// First run of digits and thousands separators, e.g. "£1,250,000" ->
/// 1250000. Returns [`PRICE_NOT_SET`] when there is no number.
pub fn parse_price(text: &str) -> i64 {
    let Some(found) = price_pattern().find(text) else {
        return PRICE_NOT_SET;
    };

    let run = found.as_str().trim_end_matches(',');
    if !run.starts_with(|c: char| c.is_ascii_digit()) {
        return PRICE_NOT_SET;
    }

    run.replace(',', "").parse::<i64>().unwrap_or(PRICE_NOT_SET)
}
