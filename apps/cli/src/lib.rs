pub mod commands;
pub mod config;
pub mod display;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use correction_core::{ContentStore, FlashcardDeck, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{parse_command, Command, HELP};
use crate::config::Config;
use crate::display::{render_card, render_practice, selectable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Practice,
    Cards,
}

/// Terminal front-end state over a borrowed content store.
pub struct App<'a> {
    store: &'a ContentStore,
    session: Session<'a>,
    deck: FlashcardDeck,
    view: View,
    config: Config,
}

impl<'a> App<'a> {
    pub fn new(store: &'a ContentStore, config: Config) -> Self {
        Self {
            store,
            session: Session::with_matching_mode(store, config.matching_mode),
            deck: FlashcardDeck::new(),
            view: View::Cards,
            config,
        }
    }

    pub fn session(&self) -> &Session<'a> {
        &self.session
    }

    /// Apply one command. Returns false when the learner quits.
    pub fn handle(&mut self, command: Command, out: &mut impl Write) -> io::Result<bool> {
        tracing::trace!(?command, "command");
        match command {
            Command::Quit => return Ok(false),
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::State => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())
                    .map_err(io::Error::other)?;
                writeln!(out, "{}", json)?;
            }
            Command::Cards => {
                self.view = View::Cards;
                self.show(out)?;
            }
            Command::Flip => {
                self.deck.flip();
                self.view = View::Cards;
                self.show(out)?;
            }
            Command::CardNext => {
                self.deck.next_card(self.store);
                self.view = View::Cards;
                self.show(out)?;
            }
            Command::CardPrev => {
                self.deck.prev_card(self.store);
                self.view = View::Cards;
                self.show(out)?;
            }
            Command::Practice => {
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Select(n) => {
                let snapshot = self.session.snapshot();
                let id = n
                    .checked_sub(1)
                    .and_then(|i| selectable(&snapshot.tokens).get(i).map(|t| t.id.clone()));
                match id {
                    Some(id) if self.session.toggle_token(&id) => {}
                    Some(_) => writeln!(out, "Words are locked after a check. Type 'retry'.")?,
                    None => writeln!(out, "There is no word {}.", n)?,
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Check => {
                match self.session.submit_identification() {
                    Some(result) if result.is_success() => {
                        writeln!(out, "{}", result.feedback())?;
                        // Let the success message land before the next stage.
                        if !self.config.reveal_delay.is_zero() {
                            out.flush()?;
                            std::thread::sleep(self.config.reveal_delay);
                        }
                    }
                    Some(_) => {}
                    None => writeln!(out, "Mark at least one word first.")?,
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Retry => {
                if !self.session.retry_identification() {
                    writeln!(out, "Nothing to retry.")?;
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Fix(n, text) => {
                let id = self
                    .session
                    .correction_round()
                    .and_then(|round| round.errors().get(n.checked_sub(1)?))
                    .map(|t| t.id.clone());
                match id {
                    Some(id) => {
                        self.session.set_answer(&id, text);
                    }
                    None => writeln!(out, "There is no error {} to fix.", n)?,
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Grade => {
                if self.session.submit_correction().is_none() {
                    writeln!(out, "Find all the errors first.")?;
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Next => {
                if !self.session.advance_to_next_text() {
                    writeln!(out, "Correct every error before moving on.")?;
                }
                self.view = View::Practice;
                self.show(out)?;
            }
            Command::Jump(n) => {
                if !n.checked_sub(1).is_some_and(|i| self.session.jump_to_text(i)) {
                    writeln!(out, "There is no text {}.", n)?;
                }
                self.view = View::Practice;
                self.show(out)?;
            }
        }
        Ok(true)
    }

    fn show(&self, out: &mut impl Write) -> io::Result<()> {
        match self.view {
            View::Practice => write!(out, "{}", render_practice(&self.session.snapshot())),
            View::Cards => write!(out, "{}", render_card(&self.deck, self.store)),
        }
    }
}

fn load_content(config: &Config) -> Result<ContentStore> {
    match &config.content_dir {
        Some(dir) => ContentStore::from_dir(dir)
            .with_context(|| format!("failed to load content from {}", dir.display())),
        None => ContentStore::builtin().context("failed to load bundled content"),
    }
}

pub fn run() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let store = load_content(&config)?;
    tracing::info!(
        flashcards = store.flashcard_count(),
        texts = store.text_count(),
        matching_mode = config.matching_mode.as_str(),
        "content loaded"
    );

    let mut app = App::new(&store, config);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    writeln!(out, "Spanish Correction. Type 'help' for commands.")?;
    app.show(&mut out)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Ok(command) => {
                if !app.handle(command, &mut out)? {
                    break;
                }
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
    }

    let stats = app.session().stats();
    tracing::info!(
        texts_completed = stats.texts_completed,
        identification_submissions = stats.identification_submissions,
        correction_submissions = stats.correction_submissions,
        "session finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_commands(app: &mut App<'_>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            let command = parse_command(line).unwrap();
            app.handle(command, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_text_from_the_prompt() {
        let store = ContentStore::builtin().unwrap();
        let mut app = App::new(&store, Config::default());

        // Text 1 words: Estioma profesor, Voy escriber esta carta en Dieciembre .
        let output = run_commands(
            &mut app,
            &["select 1", "select 3", "select 4", "select 8", "check"],
        );
        assert!(output.contains("Excellent! You found all errors."));
        assert!(app.session().is_correcting());

        let output = run_commands(
            &mut app,
            &[
                "fix 1 Estimado",
                "fix 2 voy a",
                "fix 3 escribir",
                "fix 4 Diciembre.",
                "grade",
                "next",
            ],
        );
        assert!(output.contains("Well done!"));
        assert_eq!(app.session().current_index(), 1);
    }

    #[test]
    fn locked_words_after_failed_check() {
        let store = ContentStore::builtin().unwrap();
        let mut app = App::new(&store, Config::default());
        let output = run_commands(&mut app, &["select 2", "check", "select 1"]);
        assert!(output.contains("Try again."));
        assert!(output.contains("Words are locked after a check."));
    }

    #[test]
    fn quit_stops_the_loop() {
        let store = ContentStore::builtin().unwrap();
        let mut app = App::new(&store, Config::default());
        let mut out = Vec::new();
        assert!(!app.handle(Command::Quit, &mut out).unwrap());
    }

    #[test]
    fn deck_commands_render_cards() {
        let store = ContentStore::builtin().unwrap();
        let mut app = App::new(&store, Config::default());
        let output = run_commands(&mut app, &["card prev"]);
        assert!(output.contains("Card 23 of 23"));
    }
}
