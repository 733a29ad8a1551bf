//! Leave category classification.
//!
//! Precedence is fixed: a long leave is a sabbatical whatever the reason,
//! otherwise an exhausted quota makes it unpaid, otherwise the reason's
//! keywords decide.

use chrono::NaiveDate;

use crate::model::leave_record::{CategoryUsage, LeaveCategory};

/// Leaves this long or longer are sabbaticals.
pub const SABBATICAL_MIN_DAYS: i64 = 30;

/// Checked in order; the first category with a matching keyword wins.
const KEYWORDS: [(LeaveCategory, &[&str]); 4] = [
    (
        LeaveCategory::Medical,
        &["fever", "ill", "hospital", "checkup", "covid", "sick", "surgery"],
    ),
    (
        LeaveCategory::Vacation,
        &["holiday", "travel", "vacation", "trip", "tour", "beach", "resort"],
    ),
    (
        LeaveCategory::Parental,
        &["baby", "child", "maternity", "paternity", "delivery", "birth"],
    ),
    (
        LeaveCategory::Personal,
        &["wedding", "marriage", "function", "personal", "errand", "family", "ceremony"],
    ),
];

const DEFAULT_CATEGORY: LeaveCategory = LeaveCategory::Personal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Duration,
    Quota,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Category suggested by the reason text alone.
    pub keyword: LeaveCategory,
    pub category: LeaveCategory,
    pub applied: Option<Override>,
}

/// Category suggested by the reason's keywords, matched as plain substrings of the
/// lower-cased reason. "will" contains "ill" and counts as medical.
pub fn keyword_category(reason: &str) -> LeaveCategory {
    let reason = reason.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| reason.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

pub fn classify_with_trace(
    reason: &str,
    start: NaiveDate,
    end: NaiveDate,
    usage: &CategoryUsage,
) -> Classification {
    let keyword = keyword_category(reason);
    let leave_days = (end - start).num_days() + 1;

    let (category, applied) = if leave_days >= SABBATICAL_MIN_DAYS {
        (LeaveCategory::Sabbatical, Some(Override::Duration))
    } else if keyword.quota().is_some_and(|quota| usage.get(keyword) >= quota) {
        (LeaveCategory::Unpaid, Some(Override::Quota))
    } else {
        (keyword, None)
    };

    Classification {
        keyword,
        category,
        applied,
    }
}

pub fn classify(
    reason: &str,
    start: NaiveDate,
    end: NaiveDate,
    usage: &CategoryUsage,
) -> LeaveCategory {
    classify_with_trace(reason, start, end, usage).category
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn span(days: u64) -> (NaiveDate, NaiveDate) {
        let start = d(2026, 1, 1);
        (start, start + chrono::Days::new(days - 1))
    }

    #[test]
    fn fever_for_five_days_is_medical() {
        let (s, e) = span(5);
        let usage = CategoryUsage::new().with(LeaveCategory::Medical, 0);
        assert_eq!(classify("fever", s, e, &usage), LeaveCategory::Medical);
    }

    #[test]
    fn long_leave_is_sabbatical_whatever_the_reason() {
        let (s, e) = span(35);
        assert_eq!(classify("fever", s, e, &CategoryUsage::new()), LeaveCategory::Sabbatical);

        let (s, e) = span(30);
        let trace = classify_with_trace("fever", s, e, &CategoryUsage::new());
        assert_eq!(trace.category, LeaveCategory::Sabbatical);
        assert_eq!(trace.keyword, LeaveCategory::Medical);
        assert_eq!(trace.applied, Some(Override::Duration));

        let (s, e) = span(29);
        assert_eq!(classify("fever", s, e, &CategoryUsage::new()), LeaveCategory::Medical);
    }

    #[test]
    fn duration_beats_exhausted_quota() {
        let (s, e) = span(30);
        let usage = CategoryUsage::new().with(LeaveCategory::Medical, 12);
        assert_eq!(classify("sick", s, e, &usage), LeaveCategory::Sabbatical);
    }

    #[test]
    fn exhausted_quota_falls_back_to_unpaid() {
        let (s, e) = span(2);
        let at_quota = CategoryUsage::new().with(LeaveCategory::Personal, 10);
        let trace = classify_with_trace("wedding", s, e, &at_quota);
        assert_eq!(trace.category, LeaveCategory::Unpaid);
        assert_eq!(trace.applied, Some(Override::Quota));

        let below = CategoryUsage::new().with(LeaveCategory::Personal, 9);
        assert_eq!(classify("wedding", s, e, &below), LeaveCategory::Personal);

        // Usage in another category does not matter.
        let other = CategoryUsage::new().with(LeaveCategory::Vacation, 15);
        assert_eq!(classify("wedding", s, e, &other), LeaveCategory::Personal);
    }

    #[test]
    fn each_quota_boundary() {
        let (s, e) = span(1);
        for (reason, category, quota) in [
            ("hospital visit", LeaveCategory::Medical, 12),
            ("beach trip", LeaveCategory::Vacation, 15),
            ("new baby", LeaveCategory::Parental, 30),
            ("family errand", LeaveCategory::Personal, 10),
        ] {
            let below = CategoryUsage::new().with(category, quota - 1);
            assert_eq!(classify(reason, s, e, &below), category, "{reason}");
            let at = CategoryUsage::new().with(category, quota);
            assert_eq!(classify(reason, s, e, &at), LeaveCategory::Unpaid, "{reason}");
        }
    }

    #[test]
    fn unknown_reason_defaults_to_personal() {
        let (s, e) = span(1);
        assert_eq!(classify("need a break", s, e, &CategoryUsage::new()), LeaveCategory::Personal);
        assert_eq!(classify("", s, e, &CategoryUsage::new()), LeaveCategory::Personal);
    }

    #[test]
    fn table_order_decides_ties() {
        // "sick" (medical) is declared before "family" (personal).
        assert_eq!(keyword_category("Family member is sick"), LeaveCategory::Medical);
        assert_eq!(keyword_category("Holidays with the child"), LeaveCategory::Vacation);
    }

    #[test]
    fn keywords_match_anywhere_in_the_reason() {
        assert_eq!(keyword_category("homesick"), LeaveCategory::Medical);
        assert_eq!(keyword_category("chills and body ache"), LeaveCategory::Medical);
        assert_eq!(keyword_category("grandbaby arrived"), LeaveCategory::Parental);
        assert_eq!(keyword_category("daytrip"), LeaveCategory::Vacation);
        assert_eq!(keyword_category("ILLNESS"), LeaveCategory::Medical);
        // Known limitation of substring matching.
        assert_eq!(keyword_category("I will be at a wedding"), LeaveCategory::Medical);
    }
}
