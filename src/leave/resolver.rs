//! Resolve a normalized duration phrase into a concrete inclusive date range.

use chrono::{Datelike, Days, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LeaveError;
use crate::leave::date_parser::DateParser;

static RANGE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:to|-)\s+").expect("range separator pattern is valid"));

static SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:for\b.*?\b|(?:(?:next|coming|upcoming|the)\s+)+)(\d+)\s+(day|week|month)s?\b")
        .expect("span pattern is valid")
});

/// Dates before this year come from parsers filling in a placeholder year.
const EARLIEST_PLAUSIBLE_YEAR: i32 = 2000;

pub fn resolve(
    normalized: &str,
    today: NaiveDate,
    parser: &dyn DateParser,
) -> Result<(NaiveDate, NaiveDate), LeaveError> {
    let text = normalized.trim();
    if text.is_empty() {
        return Err(LeaveError::EmptyDuration);
    }

    if let Some(range) = numeric_span(text, today)? {
        return Ok(range);
    }

    let text = strip_from(text);
    let parts: Vec<&str> = RANGE_SEPARATOR.split(text).map(str::trim).collect();

    let (start, end) = match parts.as_slice() {
        [single] => {
            let date = parse_one(single, today, parser)?;
            (date, date)
        }
        [first, second] => (
            parse_one(first, today, parser)?,
            parse_one(second, today, parser)?,
        ),
        _ => {
            return Err(LeaveError::invalid(format!(
                "'{normalized}' has more than one range separator"
            )));
        }
    };

    if start > end {
        return Err(LeaveError::invalid(format!(
            "leave would start on {start} after it ends on {end}"
        )));
    }
    Ok((start, end))
}

fn strip_from(text: &str) -> &str {
    match text.get(..4) {
        Some(head)
            if head.eq_ignore_ascii_case("from")
                && text[4..].chars().next().is_none_or(char::is_whitespace) =>
        {
            text[4..].trim()
        }
        _ => text,
    }
}

// "for <n> days" or "next <n> days" (weeks, months), anchored at today and inclusive of it.
fn numeric_span(text: &str, today: NaiveDate) -> Result<Option<(NaiveDate, NaiveDate)>, LeaveError> {
    let Some(caps) = SPAN.captures(text) else {
        return Ok(None);
    };
    let n: u32 = caps[1]
        .parse()
        .map_err(|_| LeaveError::invalid(format!("'{}' is not a usable count", &caps[1])))?;
    if n == 0 {
        return Err(LeaveError::invalid("a leave must last at least one day"));
    }

    let past_end = match caps[2].to_lowercase().as_str() {
        "day" => today.checked_add_days(Days::new(n.into())),
        "week" => today.checked_add_days(Days::new(u64::from(n) * 7)),
        _ => today.checked_add_months(Months::new(n)),
    };
    let end = past_end
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| LeaveError::invalid(format!("'{text}' reaches past the calendar")))?;
    Ok(Some((today, end)))
}

fn parse_one(expr: &str, today: NaiveDate, parser: &dyn DateParser) -> Result<NaiveDate, LeaveError> {
    let date = parser
        .parse(expr, today)
        .ok_or_else(|| LeaveError::invalid(format!("'{expr}' is not a date I understand")))?;
    correct_year(date, today)
}

/// Move a date with a placeholder year into the current year, keeping month and day.
pub fn correct_year(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, LeaveError> {
    if date.year() >= EARLIEST_PLAUSIBLE_YEAR {
        return Ok(date);
    }
    date.with_year(today.year()).ok_or_else(|| {
        LeaveError::invalid(format!(
            "{}-{:02} does not exist in {}",
            date.month(),
            date.day(),
            today.year()
        ))
    })
}
