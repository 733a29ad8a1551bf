//! Natural-language calendar date parsing.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Turns one human date expression into a calendar date, relative to `today`.
///
/// Implementations may return implausible years (before 2000) when the
/// expression has none; the resolver corrects those.
pub trait DateParser: Send + Sync {
    fn parse(&self, expr: &str, today: NaiveDate) -> Option<NaiveDate>;
}

const NUMERIC_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const FILLERS: [&str; 3] = ["on", "the", "of"];

/// Parser for the phrasings requesters actually type: ISO and day-first numeric
/// dates, `5th March 2026`, `March 5`, weekday names, and relative words.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateParser;

impl DateParser for NaturalDateParser {
    fn parse(&self, expr: &str, today: NaiveDate) -> Option<NaiveDate> {
        let text = expr.trim().trim_end_matches('.').to_lowercase();
        if text.is_empty() {
            return None;
        }

        if let Some(date) = NUMERIC_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
        {
            return Some(date);
        }

        let words: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty() && !FILLERS.contains(w))
            .collect();

        relative(&words, today)
            .or_else(|| weekday(&words, today))
            .or_else(|| calendar(&words, today))
    }
}

fn relative(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let qualified = words.first().is_some_and(|w| is_qualifier(w));
    let rest: Vec<&str> = words.iter().copied().skip_while(|w| is_qualifier(w)).collect();
    match rest.as_slice() {
        ["week"] if qualified => return today.checked_add_days(Days::new(7)),
        ["month"] if qualified => return today.checked_add_months(Months::new(1)),
        _ => {}
    }

    match words {
        ["today"] => Some(today),
        ["tomorrow"] => today.checked_add_days(Days::new(1)),
        ["day", "after"] | ["day", "after", "tomorrow"] => today.checked_add_days(Days::new(2)),
        ["in", n, unit] => {
            let n: u64 = n.parse().ok()?;
            match *unit {
                "day" | "days" => today.checked_add_days(Days::new(n)),
                "week" | "weeks" => today.checked_add_days(Days::new(n.checked_mul(7)?)),
                "month" | "months" => today.checked_add_months(Months::new(u32::try_from(n).ok()?)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn is_qualifier(word: &str) -> bool {
    matches!(word, "next" | "coming" | "this" | "upcoming")
}

fn weekday(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let strict = words.iter().any(|w| *w == "next");
    let rest: Vec<&str> = words.iter().copied().skip_while(|w| is_qualifier(w)).collect();

    let (target, next_week) = match rest.as_slice() {
        [day] => (parse_weekday(day)?, false),
        [day, "next", "week"] => (parse_weekday(day)?, true),
        _ => return None,
    };

    let from_today = (target.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    if next_week {
        let monday = today.checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))?;
        return monday.checked_add_days(Days::new(7 + target.num_days_from_monday() as u64));
    }
    let ahead = if strict && from_today == 0 { 7 } else { from_today };
    today.checked_add_days(Days::new(ahead as u64))
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    let day = match word {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn parse_month(word: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    MONTHS
        .iter()
        .position(|m| *m == word || (word.len() >= 3 && m.starts_with(word)))
        .map(|i| i as u32 + 1)
}

fn parse_day(word: &str) -> Option<u32> {
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))
        .unwrap_or(word);
    digits.parse().ok().filter(|d| (1..=31).contains(d))
}

fn parse_year(word: &str) -> Option<i32> {
    if word.len() == 4 {
        word.parse().ok()
    } else {
        None
    }
}

fn calendar(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let (day, month, year) = match words {
        [a, b] => {
            let (day, month) = day_month(a, b)?;
            (day, month, today.year())
        }
        [a, b, y] => {
            let (day, month) = day_month(a, b)?;
            (day, month, parse_year(y)?)
        }
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

// Accepts both "5 march" and "march 5".
fn day_month(a: &str, b: &str) -> Option<(u32, u32)> {
    if let (Some(day), Some(month)) = (parse_day(a), parse_month(b)) {
        return Some((day, month));
    }
    Some((parse_day(b)?, parse_month(a)?))
}
