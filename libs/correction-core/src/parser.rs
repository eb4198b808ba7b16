//! Line-oriented parser for catalog and practice text files.
//!
//! # Format
//! ```text
//! ID: 1
//! TITLE: Texto 1: Una carta
//! TEXT: [Estioma|Estimado] profesor, [Voy|Voy a] [escriber|escribir]
//! esta carta en [Dieciembre|diciembre].
//!
//! ID: 8
//! CATEGORY: Gramática
//! INCORRECT: Voy escriber
//! CORRECT: Voy a escribir
//! EXPLANATION: Missing preposition "a" in the structure Ir + a + Infinitive.
//! ```
//!
//! `[text|correction]` marks an error token. Everything outside the
//! brackets becomes plain word tokens that keep their trailing whitespace,
//! so joining the tokens gives back the original text.

use crate::error::{ParseError, Result};
use crate::types::{Category, ErrorItem, PracticeText, Token};
use std::collections::{HashMap, HashSet};

/// Parse practice texts.
pub fn parse_texts(content: &str) -> Result<Vec<PracticeText>> {
    parse_records(content)?
        .into_iter()
        .map(RawRecord::into_text)
        .collect()
}

/// Parse the flashcard catalog.
pub fn parse_catalog(content: &str) -> Result<Vec<ErrorItem>> {
    parse_records(content)?
        .into_iter()
        .map(RawRecord::into_error_item)
        .collect()
}

fn parse_records(content: &str) -> Result<Vec<RawRecord>> {
    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }

    Ok(parser.finalize())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Title,
    Text,
    Category,
    Incorrect,
    Correct,
    Explanation,
}

impl Field {
    const ALL: [Field; 6] = [
        Field::Title,
        Field::Text,
        Field::Category,
        Field::Incorrect,
        Field::Correct,
        Field::Explanation,
    ];

    fn prefix(self) -> &'static str {
        match self {
            Field::Title => "TITLE:",
            Field::Text => "TEXT:",
            Field::Category => "CATEGORY:",
            Field::Incorrect => "INCORRECT:",
            Field::Correct => "CORRECT:",
            Field::Explanation => "EXPLANATION:",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Text => "text",
            Field::Category => "category",
            Field::Incorrect => "incorrect form",
            Field::Correct => "correct form",
            Field::Explanation => "explanation",
        }
    }
}

struct RawRecord {
    id: String,
    start_line: usize,
    fields: HashMap<Field, (String, usize)>,
}

impl RawRecord {
    fn new(id: String, start_line: usize) -> Self {
        Self {
            id,
            start_line,
            fields: HashMap::new(),
        }
    }

    fn take(&mut self, field: Field) -> Option<(String, usize)> {
        self.fields.remove(&field)
    }

    fn require(&mut self, field: Field) -> Result<(String, usize)> {
        self.take(field).ok_or(ParseError::MissingField {
            field: field.name(),
            line: self.start_line,
        })
    }

    fn into_text(mut self) -> Result<PracticeText> {
        let id = self.id.parse::<u32>().map_err(|_| ParseError::InvalidId {
            line: self.start_line,
            value: self.id.clone(),
        })?;
        let (title, _) = self.take(Field::Title).ok_or(ParseError::MissingTitle {
            line: self.start_line,
        })?;
        let (body, body_line) = self.take(Field::Text).ok_or(ParseError::MissingText {
            line: self.start_line,
        })?;

        Ok(PracticeText {
            id,
            title,
            tokens: tokenize(id, &body, body_line)?,
        })
    }

    fn into_error_item(mut self) -> Result<ErrorItem> {
        let (label, label_line) = self.require(Field::Category)?;
        let category = Category::from_label(&label).ok_or(ParseError::UnknownCategory {
            line: label_line,
            value: label,
        })?;
        let (incorrect, _) = self.require(Field::Incorrect)?;
        let (correct, _) = self.require(Field::Correct)?;
        let (explanation, _) = self.require(Field::Explanation)?;

        Ok(ErrorItem {
            id: self.id,
            incorrect,
            correct,
            category,
            explanation,
        })
    }
}

struct Parser {
    records: Vec<RawRecord>,
    current: Option<RawRecord>,
    current_field: Option<(Field, usize)>,
    buffer: Vec<String>,
    seen_ids: HashSet<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            current: None,
            current_field: None,
            buffer: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match Self::parse_line(line) {
            LineType::Id(id_str) => self.handle_id(id_str, line_num)?,
            LineType::Field(field, text) => self.handle_field(field, text, line_num)?,
            LineType::Text(text) => {
                if self.current_field.is_none() {
                    return Err(ParseError::OrphanLine { line: line_num });
                }
                self.buffer.push(text.to_string());
            }
            LineType::Empty => {}
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("ID:") {
            return LineType::Id(rest.trim());
        }
        for field in Field::ALL {
            if let Some(rest) = trimmed.strip_prefix(field.prefix()) {
                return LineType::Field(field, rest.trim());
            }
        }
        if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(trimmed)
        }
    }

    fn handle_id(&mut self, id_str: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();
        self.finish_record();

        if id_str.is_empty() || id_str.contains(char::is_whitespace) {
            return Err(ParseError::InvalidId {
                line: line_num,
                value: id_str.to_string(),
            });
        }
        if !self.seen_ids.insert(id_str.to_string()) {
            return Err(ParseError::DuplicateId {
                id: id_str.to_string(),
                line: line_num,
            });
        }

        self.current = Some(RawRecord::new(id_str.to_string(), line_num));
        Ok(())
    }

    fn handle_field(&mut self, field: Field, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();

        if self.current.is_none() {
            return Err(ParseError::OrphanLine { line: line_num });
        }

        self.current_field = Some((field, line_num));
        if !text.is_empty() {
            self.buffer.push(text.to_string());
        }
        Ok(())
    }

    fn flush_buffer(&mut self) {
        let Some((field, line)) = self.current_field.take() else {
            self.buffer.clear();
            return;
        };

        // Continuation lines of a text body are the same paragraph.
        let separator = if field == Field::Text { " " } else { "\n" };
        let content = self.buffer.join(separator);
        self.buffer.clear();

        if let Some(ref mut record) = self.current {
            record.fields.insert(field, (content.trim().to_string(), line));
        }
    }

    fn finish_record(&mut self) {
        if let Some(record) = self.current.take() {
            self.records.push(record);
        }
    }

    fn finalize(mut self) -> Vec<RawRecord> {
        self.flush_buffer();
        self.finish_record();
        self.records
    }
}

enum LineType<'a> {
    Id(&'a str),
    Field(Field, &'a str),
    Text(&'a str),
    Empty,
}

/// Split a text body into tokens.
fn tokenize(text_id: u32, body: &str, line: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = body;

    while let Some(open) = rest.find('[') {
        push_words(text_id, &rest[..open], &mut tokens);

        let after = &rest[open + 1..];
        let close = after
            .find(']')
            .ok_or(ParseError::UnterminatedMarker { line })?;
        let marker = &after[..close];

        let id = format!("{}-{}", text_id, tokens.len());
        let token = match marker.split_once('|') {
            Some((text, correction)) => Token::error(id, text.trim(), correction.trim()),
            // Kept as-is so integrity checks can report it.
            None => Token {
                id,
                text: marker.trim().to_string(),
                is_error: true,
                correction: None,
            },
        };
        tokens.push(token);

        rest = &after[close + 1..];
    }
    push_words(text_id, rest, &mut tokens);

    Ok(tokens)
}

/// Push one plain token per word, each with its trailing whitespace.
fn push_words(text_id: u32, plain: &str, tokens: &mut Vec<Token>) {
    let mut current = String::new();
    let mut after_space = false;

    for ch in plain.chars() {
        if ch.is_whitespace() {
            after_space = true;
        } else {
            if after_space && current.chars().any(|c| !c.is_whitespace()) {
                let id = format!("{}-{}", text_id, tokens.len());
                tokens.push(Token::plain(id, std::mem::take(&mut current)));
            }
            after_space = false;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        let id = format!("{}-{}", text_id, tokens.len());
        tokens.push(Token::plain(id, current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_single_text() {
        let input = "ID: 1\nTITLE: Una carta\nTEXT: [Estioma|Estimado] profesor.";
        let texts = parse_texts(input).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].id, 1);
        assert_eq!(texts[0].title, "Una carta");
        assert_eq!(
            texts[0].tokens,
            vec![
                Token::error("1-0", "Estioma", "Estimado"),
                Token::plain("1-1", " profesor."),
            ]
        );
    }

    #[test]
    fn plain_text_splits_into_words() {
        let input = "ID: 2\nTITLE: T\nTEXT: Hace mucho [caro|calor] hoy.";
        let texts = parse_texts(input).unwrap();
        let words: Vec<&str> = texts[0].tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Hace ", "mucho ", "caro", " hoy."]);
    }

    #[test]
    fn tokens_reconstruct_sentence() {
        let input = "ID: 3\nTITLE: T\nTEXT: [Voy|Voy a] [escriber|escribir] esta carta en [Dieciembre|diciembre].";
        let texts = parse_texts(input).unwrap();
        assert_eq!(texts[0].sentence(), "Voy escriber esta carta en Dieciembre.");
        assert_eq!(texts[0].error_ids(), vec!["3-0", "3-2", "3-6"]);
    }

    #[test]
    fn text_continues_over_lines() {
        let input = "ID: 4\nTITLE: T\nTEXT: Quiero [comprender|comprar]\nun bolso.";
        let texts = parse_texts(input).unwrap();
        assert_eq!(texts[0].sentence(), "Quiero comprender un bolso.");
    }

    #[test]
    fn multi_answer_correction_kept_verbatim() {
        let input = "ID: 10\nTITLE: T\nTEXT: [Dice es mi|Digo que es mi / Esta es mi] mejor amiga.";
        let texts = parse_texts(input).unwrap();
        assert_eq!(
            texts[0].tokens[0].correction.as_deref(),
            Some("Digo que es mi / Esta es mi")
        );
    }

    #[test]
    fn marker_without_correction_is_kept() {
        let input = "ID: 5\nTITLE: T\nTEXT: [anté] del verano.";
        let texts = parse_texts(input).unwrap();
        assert!(texts[0].tokens[0].is_error);
        assert_eq!(texts[0].tokens[0].correction, None);
    }

    #[test]
    fn parse_multiple_texts() {
        let input = "ID: 1\nTITLE: A\nTEXT: uno\n\nID: 2\nTITLE: B\nTEXT: [dos|tres]";
        let texts = parse_texts(input).unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].tokens[0].id, "2-0");
    }

    #[test]
    fn parse_catalog_entry() {
        let input = "ID: 8\nCATEGORY: Gramática\nINCORRECT: Voy escriber\nCORRECT: Voy a escribir\nEXPLANATION: Missing preposition \"a\".";
        let items = parse_catalog(input).unwrap();
        assert_eq!(
            items,
            vec![ErrorItem {
                id: "8".to_string(),
                incorrect: "Voy escriber".to_string(),
                correct: "Voy a escribir".to_string(),
                category: Category::Gramatica,
                explanation: "Missing preposition \"a\".".to_string(),
            }]
        );
    }

    #[test]
    fn reject_unknown_category() {
        let input = "ID: 1\nCATEGORY: Sintaxis\nINCORRECT: a\nCORRECT: b\nEXPLANATION: c";
        let result = parse_catalog(input);
        assert!(matches!(result, Err(ParseError::UnknownCategory { line: 2, .. })));
    }

    #[test]
    fn reject_missing_explanation() {
        let input = "ID: 1\nCATEGORY: Léxico\nINCORRECT: a\nCORRECT: b";
        let result = parse_catalog(input);
        assert!(matches!(
            result,
            Err(ParseError::MissingField { field: "explanation", .. })
        ));
    }

    #[test]
    fn reject_duplicate_ids() {
        let input = "ID: 1\nTITLE: A\nTEXT: a\n\nID: 1\nTITLE: B\nTEXT: b";
        let result = parse_texts(input);
        assert!(matches!(result, Err(ParseError::DuplicateId { line: 5, .. })));
    }

    #[test]
    fn reject_non_numeric_text_id() {
        let input = "ID: uno\nTITLE: A\nTEXT: a";
        assert!(matches!(parse_texts(input), Err(ParseError::InvalidId { .. })));
    }

    #[test]
    fn reject_missing_title() {
        let input = "ID: 1\nTEXT: a";
        assert!(matches!(parse_texts(input), Err(ParseError::MissingTitle { line: 1 })));
    }

    #[test]
    fn reject_unterminated_marker() {
        let input = "ID: 1\nTITLE: A\nTEXT: [caro|calor hoy";
        assert!(matches!(
            parse_texts(input),
            Err(ParseError::UnterminatedMarker { line: 3 })
        ));
    }

    #[test]
    fn reject_orphan_text() {
        let input = "hola\nID: 1\nTITLE: A\nTEXT: a";
        assert!(matches!(parse_texts(input), Err(ParseError::OrphanLine { line: 1 })));
    }

    #[test]
    fn parse_empty_content() {
        assert!(parse_texts("").unwrap().is_empty());
        assert!(parse_catalog("  \n").unwrap().is_empty());
    }
}
