//! Due date extraction.

use super::patterns::DUE_DATE;
use super::{FieldRule, RuleMatch};

/// Labeled due date rule.
///
/// Matches `Due Date` followed by a DD/MM/YYYY shape. The digits are
/// not checked against a calendar, so `31/13/2025` passes.
pub struct DueDateRule;

impl DueDateRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DueDateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for DueDateRule {
    type Output = String;

    fn name(&self) -> &'static str {
        "due_date"
    }

    fn extract(&self, text: &str) -> Option<RuleMatch<String>> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<RuleMatch<String>> {
        DUE_DATE
            .captures_iter(text)
            .map(|caps| {
                let full = caps.get(0).unwrap();
                RuleMatch::new(caps[1].to_string(), full.start(), full.end())
            })
            .collect()
    }
}

/// Extract the first labeled due date from text.
pub fn extract_due_date(text: &str) -> Option<String> {
    DueDateRule::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_labeled_date() {
        assert_eq!(
            extract_due_date("Due Date: 01/05/2025"),
            Some("01/05/2025".to_string())
        );
    }

    #[test]
    fn test_label_is_case_insensitive() {
        assert_eq!(
            extract_due_date("DUE DATE 15/06/2025"),
            Some("15/06/2025".to_string())
        );
        assert_eq!(
            extract_due_date("due date:15/06/2025"),
            Some("15/06/2025".to_string())
        );
    }

    #[test]
    fn test_impossible_date_still_matches() {
        assert_eq!(
            extract_due_date("Due Date: 31/13/2025"),
            Some("31/13/2025".to_string())
        );
    }

    #[test]
    fn test_unlabeled_date_is_ignored() {
        assert_eq!(extract_due_date("Issued 01/05/2025"), None);
    }

    #[test]
    fn test_requires_two_digit_day_and_month() {
        assert_eq!(extract_due_date("Due Date: 1/5/2025"), None);
    }

    #[test]
    fn test_first_of_multiple_wins() {
        let text = "Due Date: 01/05/2025 revised Due Date: 01/06/2025";
        assert_eq!(extract_due_date(text), Some("01/05/2025".to_string()));

        let rule = DueDateRule::new();
        assert_eq!(rule.extract_all(text).len(), 2);
    }
}
