//! Exercise sequencing: identify the errors of a text, then correct them,
//! then move on to the next text.

use crate::content::ContentStore;
use crate::correction::{CorrectionReport, CorrectionRound};
use crate::identification::{IdentificationAttempt, IdentificationResult};
use crate::types::{CorrectionStatus, MatchingMode, PracticeText, TokenStatus};
use serde::{Deserialize, Serialize};

/// Stage of the active text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Learner is flagging error tokens.
    Identifying(IdentificationAttempt),
    /// All errors were found; learner is typing corrections.
    Correcting {
        identified: IdentificationAttempt,
        round: CorrectionRound,
    },
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Identifying(_) => StageKind::Identifying,
            Self::Correcting { .. } => StageKind::Correcting,
        }
    }

    fn attempt(&self) -> &IdentificationAttempt {
        match self {
            Self::Identifying(attempt) => attempt,
            Self::Correcting { identified, .. } => identified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Identifying,
    Correcting,
}

/// Counters kept across text changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub texts_completed: u32,
    pub identification_submissions: u32,
    pub correction_submissions: u32,
}

/// One learner working through the practice texts.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    content: &'a ContentStore,
    index: usize,
    stage: Stage,
    mode: MatchingMode,
    stats: SessionStats,
}

impl<'a> Session<'a> {
    /// Start on the first text with standard matching.
    pub fn new(content: &'a ContentStore) -> Self {
        Self::with_matching_mode(content, MatchingMode::default())
    }

    pub fn with_matching_mode(content: &'a ContentStore, mode: MatchingMode) -> Self {
        Self {
            content,
            index: 0,
            stage: Stage::Identifying(IdentificationAttempt::new()),
            mode,
            stats: SessionStats::default(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_text(&self) -> &'a PracticeText {
        &self.content.texts()[self.index]
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn is_correcting(&self) -> bool {
        matches!(self.stage, Stage::Correcting { .. })
    }

    pub fn matching_mode(&self) -> MatchingMode {
        self.mode
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn toggle_token(&mut self, id: &str) -> bool {
        let text = self.current_text();
        match &mut self.stage {
            Stage::Identifying(attempt) => attempt.toggle(text, id),
            Stage::Correcting { .. } => false,
        }
    }

    /// Check the current selection.
    ///
    /// Returns `None` when nothing was checked: outside the identification
    /// stage, when a failed check awaits a retry, or when the selection is
    /// empty on a text that has errors. On success the session moves to
    /// the correction stage before returning.
    pub fn submit_identification(&mut self) -> Option<IdentificationResult> {
        let text = self.current_text();
        let Stage::Identifying(attempt) = &mut self.stage else {
            return None;
        };
        if attempt.is_submitted() {
            return None;
        }
        if attempt.selection().is_empty() && text.tokens.iter().any(|t| t.is_error) {
            return None;
        }

        let result = attempt.submit(text).clone();
        self.stats.identification_submissions += 1;

        if result.is_success() {
            let identified = std::mem::take(attempt);
            let round = CorrectionRound::new(text.error_tokens(), self.mode);
            tracing::debug!(
                text_id = text.id,
                errors = round.errors().len(),
                "identification complete, correcting"
            );
            self.stage = Stage::Correcting { identified, round };
        } else {
            tracing::debug!(
                text_id = text.id,
                missed = result.missed_count(),
                false_positives = result.false_positive_count(),
                "identification failed"
            );
        }
        Some(result)
    }

    /// Clear the selection and any failed check.
    pub fn retry_identification(&mut self) -> bool {
        match &mut self.stage {
            Stage::Identifying(attempt) => {
                attempt.retry();
                true
            }
            Stage::Correcting { .. } => false,
        }
    }

    pub fn set_answer(&mut self, id: &str, text: impl Into<String>) -> bool {
        match &mut self.stage {
            Stage::Correcting { round, .. } => round.set_answer(id, text),
            Stage::Identifying(_) => false,
        }
    }

    pub fn submit_correction(&mut self) -> Option<CorrectionReport> {
        let Stage::Correcting { round, .. } = &mut self.stage else {
            return None;
        };
        let report = round.submit();
        self.stats.correction_submissions += 1;
        tracing::debug!(
            text_id = self.content.texts()[self.index].id,
            all_correct = report.all_correct,
            "corrections graded"
        );
        Some(report)
    }

    /// Move to the next text once every correction is right.
    pub fn advance_to_next_text(&mut self) -> bool {
        match &self.stage {
            Stage::Correcting { round, .. } if round.all_correct() => {}
            _ => return false,
        }
        self.stats.texts_completed += 1;
        let next = self.content.next_text_index(self.index);
        self.load(next);
        true
    }

    /// Restart at text `index`, discarding all in-flight state.
    pub fn jump_to_text(&mut self, index: usize) -> bool {
        if index >= self.content.text_count() {
            return false;
        }
        self.load(index);
        true
    }

    fn load(&mut self, index: usize) {
        self.index = index;
        self.stage = Stage::Identifying(IdentificationAttempt::new());
        tracing::debug!(index, text_id = self.current_text().id, "text loaded");
    }

    /// Display classification of a token of the current text.
    pub fn token_status(&self, id: &str) -> Option<TokenStatus> {
        let token = self.current_text().token(id)?;
        Some(self.stage.attempt().status_of(token))
    }

    pub fn field_status(&self, id: &str) -> CorrectionStatus {
        match &self.stage {
            Stage::Correcting { round, .. } => round.status_of(id),
            Stage::Identifying(_) => CorrectionStatus::Ungraded,
        }
    }

    pub fn correction_round(&self) -> Option<&CorrectionRound> {
        match &self.stage {
            Stage::Correcting { round, .. } => Some(round),
            Stage::Identifying(_) => None,
        }
    }

    /// Feedback from the last identification check, if any.
    pub fn identification_result(&self) -> Option<&IdentificationResult> {
        self.stage.attempt().result()
    }

    /// Everything a presentation layer needs to draw the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let text = self.current_text();
        let attempt = self.stage.attempt();

        let tokens = text
            .tokens
            .iter()
            .map(|t| TokenView {
                id: t.id.clone(),
                text: t.text.clone(),
                status: attempt.status_of(t),
            })
            .collect();

        let (fields, all_correct) = match &self.stage {
            Stage::Correcting { round, .. } => (
                round
                    .errors()
                    .iter()
                    .map(|t| FieldView {
                        id: t.id.clone(),
                        text: t.text.clone(),
                        answer: round.answer(&t.id).unwrap_or_default().to_string(),
                        status: round.status_of(&t.id),
                        hint: round.hint(&t.id).map(str::to_string),
                    })
                    .collect(),
                round.all_correct(),
            ),
            Stage::Identifying(_) => (Vec::new(), false),
        };

        SessionSnapshot {
            text_index: self.index,
            text_count: self.content.text_count(),
            text_id: text.id,
            title: text.title.clone(),
            stage: self.stage.kind(),
            tokens,
            feedback: attempt.result().map(IdentificationResult::feedback),
            fields,
            all_correct,
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub text_index: usize,
    pub text_count: usize,
    pub text_id: u32,
    pub title: String,
    pub stage: StageKind,
    pub tokens: Vec<TokenView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub fields: Vec<FieldView>,
    pub all_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub id: String,
    pub text: String,
    pub status: TokenStatus,
}

/// One correction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub id: String,
    /// The erroneous text being corrected.
    pub text: String,
    pub answer: String,
    pub status: CorrectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
