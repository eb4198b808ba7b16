//! Error identification: which tokens did the learner flag?

use crate::types::{PracticeText, Token, TokenStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Token ids selected by the learner for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add the id if absent, remove it otherwise. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of checking a selection against a text's error tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IdentificationResult {
    Success,
    Failure {
        /// Error tokens the learner did not select.
        missed: BTreeSet<String>,
        /// Non-error tokens the learner selected.
        false_positives: BTreeSet<String>,
    },
}

impl IdentificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn missed_count(&self) -> usize {
        match self {
            Self::Success => 0,
            Self::Failure { missed, .. } => missed.len(),
        }
    }

    pub fn false_positive_count(&self) -> usize {
        match self {
            Self::Success => 0,
            Self::Failure {
                false_positives, ..
            } => false_positives.len(),
        }
    }

    /// Feedback line shown after a check.
    pub fn feedback(&self) -> String {
        match self {
            Self::Success => "Excellent! You found all errors.".to_string(),
            Self::Failure {
                missed,
                false_positives,
            } => {
                let mut msg = String::from("Try again.");
                if !missed.is_empty() {
                    msg.push_str(&format!(" You missed {} errors.", missed.len()));
                }
                if !false_positives.is_empty() {
                    msg.push_str(&format!(
                        " You selected {} correct words by mistake.",
                        false_positives.len()
                    ));
                }
                msg
            }
        }
    }
}

/// Compare a selection with the error tokens of a text.
///
/// Selected ids that name no token of the text are ignored.
pub fn evaluate_identification(text: &PracticeText, selection: &Selection) -> IdentificationResult {
    let mut missed = BTreeSet::new();
    let mut false_positives = BTreeSet::new();

    for token in &text.tokens {
        match (token.is_error, selection.contains(&token.id)) {
            (true, false) => {
                missed.insert(token.id.clone());
            }
            (false, true) => {
                false_positives.insert(token.id.clone());
            }
            _ => {}
        }
    }

    if missed.is_empty() && false_positives.is_empty() {
        IdentificationResult::Success
    } else {
        IdentificationResult::Failure {
            missed,
            false_positives,
        }
    }
}

/// Display classification of a token.
pub fn classify_token(token: &Token, selection: &Selection, submitted: bool) -> TokenStatus {
    let selected = selection.contains(&token.id);

    if !submitted {
        return if selected {
            TokenStatus::Selected
        } else {
            TokenStatus::Unselected
        };
    }

    match (token.is_error, selected) {
        (true, true) => TokenStatus::CorrectlyFound,
        (true, false) => TokenStatus::Missed,
        (false, true) => TokenStatus::FalsePositive,
        (false, false) => TokenStatus::Neutral,
    }
}

/// One identification attempt on a text: the learner's selection and,
/// once checked, the result. Toggling is locked after a check until retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationAttempt {
    selection: Selection,
    result: Option<IdentificationResult>,
}

impl IdentificationAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn result(&self) -> Option<&IdentificationResult> {
        self.result.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    /// Toggle a token. Ignored for ids outside the text and after a check.
    pub fn toggle(&mut self, text: &PracticeText, id: &str) -> bool {
        if self.is_submitted() || !text.contains_token(id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Check the selection and lock it.
    pub fn submit(&mut self, text: &PracticeText) -> &IdentificationResult {
        let result = evaluate_identification(text, &self.selection);
        self.result.insert(result)
    }

    /// Clear the check and the selection.
    pub fn retry(&mut self) {
        self.selection = Selection::new();
        self.result = None;
    }

    pub fn status_of(&self, token: &Token) -> TokenStatus {
        classify_token(token, &self.selection, self.is_submitted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text() -> PracticeText {
        PracticeText {
            id: 4,
            title: "De compras".to_string(),
            tokens: vec![
                Token::plain("4-0", "Quiero "),
                Token::error("4-1", "comprender", "comprar"),
                Token::plain("4-2", " un bolso "),
                Token::error("4-3", "gante", "grande"),
                Token::plain("4-4", "."),
            ],
        }
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_selection_succeeds() {
        let selection: Selection = ["4-1", "4-3"].into_iter().collect();
        assert_eq!(evaluate_identification(&text(), &selection), IdentificationResult::Success);
    }

    #[test]
    fn partial_selection_reports_missed() {
        let selection: Selection = ["4-1"].into_iter().collect();
        let result = evaluate_identification(&text(), &selection);
        assert_eq!(
            result,
            IdentificationResult::Failure {
                missed: ids(&["4-3"]),
                false_positives: BTreeSet::new(),
            }
        );
        assert_eq!(result.feedback(), "Try again. You missed 1 errors.");
    }

    #[test]
    fn non_error_selection_is_false_positive() {
        let selection: Selection = ["4-1", "4-3", "4-2"].into_iter().collect();
        let result = evaluate_identification(&text(), &selection);
        assert_eq!(result.false_positive_count(), 1);
        assert_eq!(result.missed_count(), 0);
        assert_eq!(
            result.feedback(),
            "Try again. You selected 1 correct words by mistake."
        );
    }

    #[test]
    fn empty_selection_misses_everything() {
        let result = evaluate_identification(&text(), &Selection::new());
        assert_eq!(result.missed_count(), 2);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let selection: Selection = ["4-1", "4-3", "9-9"].into_iter().collect();
        assert!(evaluate_identification(&text(), &selection).is_success());
    }

    #[test]
    fn classification_before_submit() {
        let selection: Selection = ["4-0"].into_iter().collect();
        let t = text();
        assert_eq!(classify_token(&t.tokens[0], &selection, false), TokenStatus::Selected);
        assert_eq!(classify_token(&t.tokens[1], &selection, false), TokenStatus::Unselected);
    }

    #[test]
    fn classification_after_submit() {
        let selection: Selection = ["4-0", "4-1"].into_iter().collect();
        let t = text();
        assert_eq!(classify_token(&t.tokens[0], &selection, true), TokenStatus::FalsePositive);
        assert_eq!(classify_token(&t.tokens[1], &selection, true), TokenStatus::CorrectlyFound);
        assert_eq!(classify_token(&t.tokens[2], &selection, true), TokenStatus::Neutral);
        assert_eq!(classify_token(&t.tokens[3], &selection, true), TokenStatus::Missed);
    }

    #[test]
    fn attempt_locks_after_submit_until_retry() {
        let t = text();
        let mut attempt = IdentificationAttempt::new();
        assert!(attempt.toggle(&t, "4-1"));
        assert!(!attempt.submit(&t).is_success());

        assert!(!attempt.toggle(&t, "4-3"));
        assert!(!attempt.selection().contains("4-3"));

        attempt.retry();
        assert!(!attempt.is_submitted());
        assert!(attempt.selection().is_empty());
        assert!(attempt.toggle(&t, "4-3"));
    }

    #[test]
    fn attempt_ignores_unknown_tokens() {
        let t = text();
        let mut attempt = IdentificationAttempt::new();
        assert!(!attempt.toggle(&t, "nope"));
        assert!(attempt.selection().is_empty());
    }

    #[test]
    fn toggle_twice_deselects() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn success_feedback() {
        assert_eq!(
            IdentificationResult::Success.feedback(),
            "Excellent! You found all errors."
        );
    }
}
