//! Grading of typed corrections.

use crate::types::{CorrectionStatus, MatchingMode, Token};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Learner-typed answers keyed by token id.
pub type AnswerMap = HashMap<String, String>;

/// Outcome of grading every error token of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Grade per error token id (never `Ungraded`).
    pub grades: BTreeMap<String, CorrectionStatus>,
    /// True when every grade is `Correct`, vacuously for no tokens.
    pub all_correct: bool,
}

/// Grade answers with the standard matching rule.
pub fn evaluate_correction(errors_to_fix: &[Token], answers: &AnswerMap) -> CorrectionReport {
    evaluate_correction_with(errors_to_fix, answers, MatchingMode::Standard)
}

/// Grade answers using the given matching mode.
pub fn evaluate_correction_with(
    errors_to_fix: &[Token],
    answers: &AnswerMap,
    mode: MatchingMode,
) -> CorrectionReport {
    let grades: BTreeMap<String, CorrectionStatus> = errors_to_fix
        .iter()
        .map(|token| {
            let typed = answers.get(&token.id).map(String::as_str).unwrap_or("");
            (token.id.clone(), grade_answer(token, typed, mode))
        })
        .collect();

    let all_correct = grades.values().all(|g| *g == CorrectionStatus::Correct);
    CorrectionReport { grades, all_correct }
}

/// Grade a single typed answer against a token's corrections.
pub fn grade_answer(token: &Token, typed: &str, mode: MatchingMode) -> CorrectionStatus {
    let accepted = accepted_answers(token.correction.as_deref());
    if answer_matches(typed, &accepted, mode) {
        CorrectionStatus::Correct
    } else {
        CorrectionStatus::Incorrect
    }
}

/// Split a correction on `/` into trimmed, lower-cased answers.
///
/// Blank pieces are dropped, so a missing or empty correction accepts nothing.
pub fn accepted_answers(correction: Option<&str>) -> Vec<String> {
    correction
        .map(|c| {
            c.split('/')
                .map(normalize_answer)
                .filter(|a| !a.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Check a typed answer against already-normalized accepted answers.
pub fn answer_matches(typed: &str, accepted: &[String], mode: MatchingMode) -> bool {
    let typed = fold(&normalize_answer(typed), mode);
    let typed_bare = strip_punctuation(&typed);

    accepted.iter().any(|answer| {
        let answer = fold(answer, mode);
        typed == answer || typed_bare == strip_punctuation(&answer)
    })
}

/// Trim and lower-case.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Remove every `.` and `,`.
fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '.' | ',')).collect()
}

fn fold(s: &str, mode: MatchingMode) -> String {
    match mode {
        MatchingMode::Standard => s.to_string(),
        MatchingMode::AccentInsensitive => s.chars().map(fold_vowel).collect(),
    }
}

/// Drop the acute accent or diaeresis from a lower-case Spanish vowel.
fn fold_vowel(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        other => other,
    }
}

/// Correction stage state for one text: frozen error list, typed answers
/// and per-field grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRound {
    errors: Vec<Token>,
    answers: AnswerMap,
    grades: HashMap<String, CorrectionStatus>,
    all_correct: bool,
    mode: MatchingMode,
}

impl CorrectionRound {
    pub fn new(errors: Vec<Token>, mode: MatchingMode) -> Self {
        Self {
            errors,
            answers: AnswerMap::new(),
            grades: HashMap::new(),
            all_correct: false,
            mode,
        }
    }

    /// Error tokens to be fixed, in text order.
    pub fn errors(&self) -> &[Token] {
        &self.errors
    }

    pub fn answer(&self, id: &str) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    /// Store a typed answer and reset only that field's grade.
    ///
    /// Returns false for ids that are not part of this round.
    pub fn set_answer(&mut self, id: &str, text: impl Into<String>) -> bool {
        if !self.errors.iter().any(|t| t.id == id) {
            return false;
        }
        self.answers.insert(id.to_string(), text.into());
        if self.grades.remove(id).is_some() {
            self.all_correct = false;
        }
        true
    }

    /// Grade every field.
    pub fn submit(&mut self) -> CorrectionReport {
        let report = evaluate_correction_with(&self.errors, &self.answers, self.mode);
        self.grades = report
            .grades
            .iter()
            .map(|(id, grade)| (id.clone(), *grade))
            .collect();
        self.all_correct = report.all_correct;
        report
    }

    pub fn status_of(&self, id: &str) -> CorrectionStatus {
        self.grades.get(id).copied().unwrap_or_default()
    }

    /// True once a submission graded every field correct and nothing was
    /// edited since.
    pub fn all_correct(&self) -> bool {
        self.all_correct
    }

    /// The raw correction to show next to a field graded incorrect.
    pub fn hint(&self, id: &str) -> Option<&str> {
        if self.status_of(id) != CorrectionStatus::Incorrect {
            return None;
        }
        self.errors
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.correction.as_deref())
    }
}
