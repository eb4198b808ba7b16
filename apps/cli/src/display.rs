//! Plain-text rendering of the session and the deck.

use correction_core::session::{SessionSnapshot, TokenView};
use correction_core::{ContentStore, CorrectionStatus, FlashcardDeck, StageKind, TokenStatus};

/// Tokens the learner can pick, numbered from 1. Whitespace-only tokens
/// are skipped.
pub fn selectable(tokens: &[TokenView]) -> Vec<&TokenView> {
    tokens.iter().filter(|t| !t.text.trim().is_empty()).collect()
}

fn mark(token: &TokenView) -> String {
    let word = token.text.trim();
    match token.status {
        TokenStatus::Unselected | TokenStatus::Neutral => word.to_string(),
        TokenStatus::Selected => format!("[{}]", word),
        TokenStatus::CorrectlyFound => format!("[+{}]", word),
        TokenStatus::Missed => format!("[?{}]", word),
        TokenStatus::FalsePositive => format!("[-{}]", word),
    }
}

pub fn render_practice(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "{} ({}/{})\n",
        snapshot.title,
        snapshot.text_index + 1,
        snapshot.text_count
    );

    let numbered = snapshot.stage == StageKind::Identifying && snapshot.feedback.is_none();
    let words: Vec<String> = selectable(&snapshot.tokens)
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            if numbered {
                format!("{}:{}", i + 1, mark(t))
            } else {
                mark(t)
            }
        })
        .collect();
    out.push_str(&words.join(" "));
    out.push('\n');

    if let Some(feedback) = &snapshot.feedback {
        out.push_str(feedback);
        out.push('\n');
    }

    match snapshot.stage {
        StageKind::Identifying => {
            out.push_str("Complete the previous activity to unlock correction.\n");
        }
        StageKind::Correcting => {
            out.push_str("Correct the errors:\n");
            for (i, field) in snapshot.fields.iter().enumerate() {
                let grade = match field.status {
                    CorrectionStatus::Correct => " ok",
                    CorrectionStatus::Incorrect => " x",
                    CorrectionStatus::Ungraded => "",
                };
                out.push_str(&format!(
                    "  {}. {} -> {}{}\n",
                    i + 1,
                    field.text,
                    field.answer,
                    grade
                ));
                if let Some(hint) = &field.hint {
                    out.push_str(&format!(
                        "     Hint: The correct answer might be \"{}\"\n",
                        hint
                    ));
                }
            }
            if snapshot.all_correct {
                out.push_str("Well done! Type 'next' for the next text.\n");
            }
        }
    }

    out
}

pub fn render_card(deck: &FlashcardDeck, store: &ContentStore) -> String {
    let Some(card) = deck.current(store) else {
        return String::new();
    };

    let mut out = format!("{}\n", deck.position(store));
    if deck.is_flipped() {
        out.push_str(&format!(
            "{}\n\"{}\"\n{}\n",
            card.category.as_str().to_uppercase(),
            card.correct,
            card.explanation
        ));
    } else {
        out.push_str(&format!(
            "COMMON ERROR\n\"{}\"\n(type 'flip' to see the correction)\n",
            card.incorrect
        ));
    }
    out
}
