//! Duration phrase normalization.
//!
//! A raw phrase from the NLU collaborator is tagged with exactly one rule and
//! the rule's prefix is applied. Rules are checked in declaration order; the
//! resolver relies on the prefix to decide how to split the phrase.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s+(day|days|week|weeks|month|months)\b")
        .expect("numeric span pattern is valid")
});

const ANCHORS: [&str; 6] = ["from", "on", "next", "coming", "tomorrow", "day after"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationRule {
    /// Starts with an anchor word, already unambiguous.
    Explicit,
    /// Contains ` to ` or ` - `.
    RangeMarker,
    /// Contains a comma.
    ListMarker,
    /// Mentions "next" somewhere after the start.
    Relative,
    /// Mentions "tomorrow" or "day after" somewhere after the start.
    Deictic,
    /// `<n> day(s)|week(s)|month(s)`.
    NumericSpan,
    Fallback,
}

impl DurationRule {
    pub const ORDER: [DurationRule; 7] = [
        DurationRule::Explicit,
        DurationRule::RangeMarker,
        DurationRule::ListMarker,
        DurationRule::Relative,
        DurationRule::Deictic,
        DurationRule::NumericSpan,
        DurationRule::Fallback,
    ];

    fn matches(&self, text: &str) -> bool {
        match self {
            DurationRule::Explicit => ANCHORS.iter().any(|a| text.starts_with(a)),
            DurationRule::RangeMarker => text.contains(" to ") || text.contains(" - "),
            DurationRule::ListMarker => text.contains(','),
            DurationRule::Relative => text.contains("next"),
            DurationRule::Deictic => text.contains("tomorrow") || text.contains("day after"),
            DurationRule::NumericSpan => NUMERIC_SPAN.is_match(text),
            DurationRule::Fallback => true,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            DurationRule::RangeMarker => "from ",
            DurationRule::ListMarker => "on ",
            DurationRule::Relative => "coming ",
            DurationRule::NumericSpan => "for ",
            DurationRule::Explicit | DurationRule::Deictic | DurationRule::Fallback => "",
        }
    }
}

/// Tag a raw phrase. `None` for empty input.
pub fn classify_duration(raw: &str) -> Option<DurationRule> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    DurationRule::ORDER.into_iter().find(|rule| rule.matches(&text))
}

/// Normalize a raw duration phrase: the rule's prefix plus the phrase with outer
/// whitespace trimmed. Empty input gives an empty string.
pub fn normalize(raw: &str) -> String {
    match classify_duration(raw) {
        Some(rule) => format!("{}{}", rule.prefix(), raw.trim()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(classify_duration(" "), None);
    }

    #[test]
    fn anchored_phrases_are_left_alone() {
        assert_eq!(normalize("From 5 March to 7 March"), "From 5 March to 7 March");
        assert_eq!(normalize("on monday"), "on monday");
        assert_eq!(normalize("next friday"), "next friday");
        assert_eq!(normalize("Tomorrow"), "Tomorrow");
        assert_eq!(normalize("day after tomorrow"), "day after tomorrow");
        assert_eq!(classify_duration("coming monday"), Some(DurationRule::Explicit));
    }

    #[test]
    fn rules_fire_in_priority_order() {
        // Range beats comma.
        assert_eq!(normalize("5 march, 2026 to 7 march"), "from 5 march, 2026 to 7 march");
        assert_eq!(normalize("5 march - 7 march"), "from 5 march - 7 march");
        // Comma beats next.
        assert_eq!(normalize("monday, next week"), "on monday, next week");
        assert_eq!(normalize("friday next week"), "coming friday next week");
        assert_eq!(classify_duration("after tomorrow"), Some(DurationRule::Deictic));
        assert_eq!(normalize("after tomorrow"), "after tomorrow");
    }

    #[test]
    fn numeric_span_gets_for_prefix() {
        assert_eq!(normalize("3 days"), "for 3 days");
        assert_eq!(normalize("2 Weeks"), "for 2 Weeks");
        assert_eq!(normalize("about 1 month"), "for about 1 month");
        // "3days" has no separator and is not a span.
        assert_eq!(classify_duration("3days"), Some(DurationRule::Fallback));
    }

    #[test]
    fn fallback_returns_trimmed_text() {
        assert_eq!(normalize("  5th march "), "5th march");
        assert_eq!(classify_duration("5th march"), Some(DurationRule::Fallback));
    }

    #[test]
    fn outer_whitespace_is_trimmed_for_every_rule() {
        assert_eq!(normalize("  3 days "), "for 3 days");
        assert_eq!(normalize(" 5 march to 7 march\t"), "from 5 march to 7 march");
        assert_eq!(normalize(" tomorrow "), "tomorrow");
        // Inner spacing is kept.
        assert_eq!(normalize("monday,  tuesday "), "on monday,  tuesday");
    }

    #[test]
    fn exactly_one_rule_fires_and_output_is_stable() {
        for raw in [
            "3 days",
            "tomorrow",
            "next monday",
            "5 march to 7 march",
            "march 5, 2026",
            "whenever",
        ] {
            let first = normalize(raw);
            assert_eq!(first, normalize(raw));
            let rule = classify_duration(raw).unwrap();
            let earlier = DurationRule::ORDER
                .iter()
                .take_while(|r| **r != rule)
                .filter(|r| r.matches(&raw.to_lowercase()))
                .count();
            assert_eq!(earlier, 0, "{raw} matched a higher priority rule");
        }
    }
}
