//! Core types for the correction trainer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a practice text, optionally marked as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub text: String,
    pub is_error: bool,
    /// Accepted corrections, `/`-separated when there is more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
}

impl Token {
    /// Create a token that contains no error.
    pub fn plain(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_error: false,
            correction: None,
        }
    }

    /// Create an error token with its expected correction.
    pub fn error(id: impl Into<String>, text: impl Into<String>, correction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_error: true,
            correction: Some(correction.into()),
        }
    }
}

/// A practice text decomposed into ordered tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeText {
    pub id: u32,
    pub title: String,
    pub tokens: Vec<Token>,
}

impl PracticeText {
    /// Tokens marked as errors, in text order.
    pub fn error_tokens(&self) -> Vec<Token> {
        self.tokens.iter().filter(|t| t.is_error).cloned().collect()
    }

    /// Ids of the error tokens, in text order.
    pub fn error_ids(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| t.is_error)
            .map(|t| t.id.as_str())
            .collect()
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn contains_token(&self, id: &str) -> bool {
        self.token(id).is_some()
    }

    /// The original sentence, reconstructed from the tokens.
    pub fn sentence(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Grammar area a catalog error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Léxico")]
    Lexico,
    #[serde(rename = "Gramática")]
    Gramatica,
    #[serde(rename = "Concordancia")]
    Concordancia,
    #[serde(rename = "Ortografía")]
    Ortografia,
    #[serde(rename = "Preposiciones")]
    Preposiciones,
}

impl Category {
    /// Spanish label as shown to the learner.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexico => "Léxico",
            Self::Gramatica => "Gramática",
            Self::Concordancia => "Concordancia",
            Self::Ortografia => "Ortografía",
            Self::Preposiciones => "Preposiciones",
        }
    }

    /// Parse from the Spanish label.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Léxico" => Some(Self::Lexico),
            "Gramática" => Some(Self::Gramatica),
            "Concordancia" => Some(Self::Concordancia),
            "Ortografía" => Some(Self::Ortografia),
            "Preposiciones" => Some(Self::Preposiciones),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flashcard describing a common learner error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub id: String,
    pub incorrect: String,
    pub correct: String,
    pub category: Category,
    pub explanation: String,
}

/// Display classification of a token during identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStatus {
    /// Chosen by the learner, not yet submitted.
    Selected,
    /// Not chosen, not yet submitted.
    Unselected,
    CorrectlyFound,
    Missed,
    FalsePositive,
    Neutral,
}

/// Grade of one typed correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionStatus {
    Correct,
    Incorrect,
    #[default]
    Ungraded,
}

/// How typed corrections are compared to the accepted answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Case-folded, tolerant of `.` and `,` differences only.
    #[default]
    Standard,
    /// Standard, plus Spanish vowel diacritics are ignored.
    AccentInsensitive,
}

impl MatchingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::AccentInsensitive => "accent_insensitive",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "accent_insensitive" => Some(Self::AccentInsensitive),
            _ => None,
        }
    }
}
