//! Read-only store of flashcards and practice texts.

use crate::correction::accepted_answers;
use crate::error::ContentError;
use crate::parser::{parse_catalog, parse_texts};
use crate::types::{ErrorItem, PracticeText};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../content/catalog.md");
const BUILTIN_TEXTS: &str = include_str!("../content/texts.md");

/// File names looked up by [`ContentStore::from_dir`].
pub const CATALOG_FILE: &str = "catalog.md";
pub const TEXTS_FILE: &str = "texts.md";

/// Fixed, non-empty lists of flashcards and practice texts.
#[derive(Debug, Clone)]
pub struct ContentStore {
    flashcards: Vec<ErrorItem>,
    texts: Vec<PracticeText>,
}

/// A content problem that grading will not paper over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Error token with no correction at all.
    MissingCorrection { text_id: u32, token_id: String },
    /// Error token whose correction contains no usable answer.
    BlankCorrection { text_id: u32, token_id: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCorrection { text_id, token_id } => {
                write!(f, "text {}: error token {} has no correction", text_id, token_id)
            }
            Self::BlankCorrection { text_id, token_id } => {
                write!(f, "text {}: error token {} has a blank correction", text_id, token_id)
            }
        }
    }
}

impl ContentStore {
    pub fn new(flashcards: Vec<ErrorItem>, texts: Vec<PracticeText>) -> Result<Self, ContentError> {
        if flashcards.is_empty() {
            return Err(ContentError::NoFlashcards);
        }
        if texts.is_empty() {
            return Err(ContentError::NoTexts);
        }
        for text in &texts {
            let mut seen = HashSet::new();
            for token in &text.tokens {
                if !seen.insert(token.id.as_str()) {
                    return Err(ContentError::DuplicateToken {
                        text_id: text.id,
                        token_id: token.id.clone(),
                    });
                }
            }
        }

        let store = Self { flashcards, texts };
        for issue in store.integrity_issues() {
            tracing::warn!(%issue, "content integrity problem");
        }
        Ok(store)
    }

    /// The catalog and texts bundled with the crate.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_sources(BUILTIN_CATALOG, "builtin catalog", BUILTIN_TEXTS, "builtin texts")
    }

    /// Load `catalog.md` and `texts.md` from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, ContentError> {
        Self::from_files(&dir.join(CATALOG_FILE), &dir.join(TEXTS_FILE))
    }

    pub fn from_files(catalog_path: &Path, texts_path: &Path) -> Result<Self, ContentError> {
        let catalog = read(catalog_path)?;
        let texts = read(texts_path)?;
        tracing::debug!(
            catalog = %catalog_path.display(),
            texts = %texts_path.display(),
            "loading content"
        );
        Self::from_sources(
            &catalog,
            &catalog_path.display().to_string(),
            &texts,
            &texts_path.display().to_string(),
        )
    }

    fn from_sources(
        catalog: &str,
        catalog_name: &str,
        texts: &str,
        texts_name: &str,
    ) -> Result<Self, ContentError> {
        let flashcards = parse_catalog(catalog).map_err(|source| ContentError::Parse {
            name: catalog_name.to_string(),
            source,
        })?;
        let texts = parse_texts(texts).map_err(|source| ContentError::Parse {
            name: texts_name.to_string(),
            source,
        })?;
        Self::new(flashcards, texts)
    }

    pub fn flashcards(&self) -> &[ErrorItem] {
        &self.flashcards
    }

    pub fn texts(&self) -> &[PracticeText] {
        &self.texts
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn flashcard_count(&self) -> usize {
        self.flashcards.len()
    }

    pub fn text_at(&self, index: usize) -> Option<&PracticeText> {
        self.texts.get(index)
    }

    pub fn flashcard_at(&self, index: usize) -> Option<&ErrorItem> {
        self.flashcards.get(index)
    }

    /// Index of the text after `index`, wrapping to the first.
    pub fn next_text_index(&self, index: usize) -> usize {
        (index + 1) % self.texts.len()
    }

    /// Error tokens whose corrections can never be matched.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        for text in &self.texts {
            for token in text.tokens.iter().filter(|t| t.is_error) {
                match token.correction.as_deref() {
                    None => issues.push(IntegrityIssue::MissingCorrection {
                        text_id: text.id,
                        token_id: token.id.clone(),
                    }),
                    Some(c) if accepted_answers(Some(c)).is_empty() => {
                        issues.push(IntegrityIssue::BlankCorrection {
                            text_id: text.id,
                            token_id: token.id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        issues
    }
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Token};

    fn card() -> ErrorItem {
        ErrorItem {
            id: "1".to_string(),
            incorrect: "caro".to_string(),
            correct: "calor".to_string(),
            category: Category::Lexico,
            explanation: "Phonetic confusion.".to_string(),
        }
    }

    fn text(id: u32, tokens: Vec<Token>) -> PracticeText {
        PracticeText {
            id,
            title: format!("Texto {}", id),
            tokens,
        }
    }

    #[test]
    fn builtin_content_loads() {
        let store = ContentStore::builtin().unwrap();
        assert_eq!(store.flashcard_count(), 23);
        assert_eq!(store.text_count(), 10);
        assert!(store.integrity_issues().is_empty());
    }

    #[test]
    fn builtin_first_text_matches_source_sentence() {
        let store = ContentStore::builtin().unwrap();
        let first = store.text_at(0).unwrap();
        assert_eq!(first.title, "Texto 1: Una carta");
        assert_eq!(
            first.sentence(),
            "Estioma profesor, Voy escriber esta carta en Dieciembre."
        );
        assert_eq!(first.error_tokens().len(), 4);
    }

    #[test]
    fn reject_empty_lists() {
        assert!(matches!(
            ContentStore::new(vec![], vec![text(1, vec![])]),
            Err(ContentError::NoFlashcards)
        ));
        assert!(matches!(
            ContentStore::new(vec![card()], vec![]),
            Err(ContentError::NoTexts)
        ));
    }

    #[test]
    fn reject_duplicate_token_ids() {
        let tokens = vec![Token::plain("a", "uno "), Token::plain("a", "dos")];
        assert!(matches!(
            ContentStore::new(vec![card()], vec![text(1, tokens)]),
            Err(ContentError::DuplicateToken { text_id: 1, .. })
        ));
    }

    #[test]
    fn next_text_index_wraps() {
        let store = ContentStore::new(
            vec![card()],
            vec![text(1, vec![]), text(2, vec![]), text(3, vec![])],
        )
        .unwrap();
        assert_eq!(store.next_text_index(0), 1);
        assert_eq!(store.next_text_index(2), 0);
    }

    #[test]
    fn integrity_issues_are_reported_not_fixed() {
        let tokens = vec![
            Token {
                id: "1-0".to_string(),
                text: "anté".to_string(),
                is_error: true,
                correction: None,
            },
            Token::error("1-1", "diá", " / "),
            Token::error("1-2", "caro", "calor"),
        ];
        let store = ContentStore::new(vec![card()], vec![text(1, tokens)]).unwrap();
        assert_eq!(
            store.integrity_issues(),
            vec![
                IntegrityIssue::MissingCorrection {
                    text_id: 1,
                    token_id: "1-0".to_string()
                },
                IntegrityIssue::BlankCorrection {
                    text_id: 1,
                    token_id: "1-1".to_string()
                },
            ]
        );
        assert_eq!(store.text_at(0).unwrap().tokens[0].correction, None);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let result = ContentStore::from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(ContentError::Io { .. })));
    }
}
