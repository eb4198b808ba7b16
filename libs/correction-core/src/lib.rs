//! Core of the Spanish correction trainer.
//!
//! Provides:
//! - Content store and parser for the error catalog and practice texts
//! - Error identification grading (which tokens did the learner flag?)
//! - Correction grading (typed fixes against `/`-separated answers)
//! - Session sequencing (identify, then correct, then next text)
//! - Flashcard deck navigation

pub mod content;
pub mod correction;
pub mod deck;
pub mod error;
pub mod identification;
pub mod parser;
pub mod session;
pub mod types;

pub use content::{ContentStore, IntegrityIssue};
pub use correction::{
    evaluate_correction, evaluate_correction_with, AnswerMap, CorrectionReport, CorrectionRound,
};
pub use deck::FlashcardDeck;
pub use error::{ContentError, ParseError, Result};
pub use identification::{
    classify_token, evaluate_identification, IdentificationAttempt, IdentificationResult, Selection,
};
pub use parser::{parse_catalog, parse_texts};
pub use session::{Session, SessionSnapshot, SessionStats, Stage, StageKind};
pub use types::{
    Category, CorrectionStatus, ErrorItem, MatchingMode, PracticeText, Token, TokenStatus,
};
