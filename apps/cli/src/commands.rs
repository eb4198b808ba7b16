//! Learner commands typed at the prompt.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the n-th word (1-based) of the current text.
    Select(usize),
    Check,
    Retry,
    /// Type the correction for the n-th error (1-based).
    Fix(usize, String),
    Grade,
    Next,
    /// Go to the n-th text (1-based).
    Jump(usize),
    Practice,
    Cards,
    Flip,
    CardNext,
    CardPrev,
    State,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("type a command, or 'help'")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("not a valid number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
practice            show the practice text
select N            mark or unmark word N as an error
check               check the marked words
retry               clear marks after a failed check
fix N TEXT          type the correction for error N
grade               check the corrections
next                go to the next text once all corrections are right
jump N              go to text N
cards               show the flashcard deck
flip                turn the current flashcard
card next|prev      move through the deck
state               print the session as JSON
quit                leave";

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "select" | "s" => Ok(Command::Select(number(rest, "select")?)),
        "check" => Ok(Command::Check),
        "retry" => Ok(Command::Retry),
        "fix" | "f" => {
            let (n, text) = match rest.split_once(char::is_whitespace) {
                Some((n, text)) => (n, text),
                None => (rest, ""),
            };
            Ok(Command::Fix(number(n, "fix")?, text.to_string()))
        }
        "grade" => Ok(Command::Grade),
        "next" => Ok(Command::Next),
        "jump" => Ok(Command::Jump(number(rest, "jump")?)),
        "practice" => Ok(Command::Practice),
        "cards" => Ok(Command::Cards),
        "flip" => Ok(Command::Flip),
        "card" => match rest.to_lowercase().as_str() {
            "next" => Ok(Command::CardNext),
            "prev" => Ok(Command::CardPrev),
            _ => Err(CommandError::MissingArgument {
                command: "card",
                what: "next or prev",
            }),
        },
        "state" => Ok(Command::State),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn number(arg: &str, command: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a number",
        });
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("check"), Ok(Command::Check));
        assert_eq!(parse_command("  GRADE "), Ok(Command::Grade));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("card prev"), Ok(Command::CardPrev));
    }

    #[test]
    fn parse_numbered_commands() {
        assert_eq!(parse_command("select 3"), Ok(Command::Select(3)));
        assert_eq!(parse_command("jump 10"), Ok(Command::Jump(10)));
    }

    #[test]
    fn fix_keeps_the_typed_text() {
        assert_eq!(
            parse_command("fix 2 Voy a  escribir."),
            Ok(Command::Fix(2, "Voy a  escribir.".to_string()))
        );
        assert_eq!(parse_command("fix 1"), Ok(Command::Fix(1, String::new())));
    }

    #[test]
    fn reject_bad_input() {
        assert_eq!(parse_command(""), Err(CommandError::Empty));
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(
            parse_command("select"),
            Err(CommandError::MissingArgument {
                command: "select",
                what: "a number"
            })
        );
        assert_eq!(
            parse_command("jump 0"),
            Err(CommandError::InvalidNumber("0".to_string()))
        );
        assert!(parse_command("card sideways").is_err());
    }
}
