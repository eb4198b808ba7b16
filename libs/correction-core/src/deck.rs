//! Flashcard deck navigation.

use crate::content::ContentStore;
use crate::types::ErrorItem;
use serde::{Deserialize, Serialize};

/// Index after `index` in a cyclic list of `len` items.
pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + 1) % len
}

/// Index before `index` in a cyclic list of `len` items.
pub fn prev_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + len - 1) % len
}

/// Position in the flashcard catalog and which side is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// True when the correction side is showing.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move to the next card, front side up.
    pub fn next_card(&mut self, store: &ContentStore) {
        self.flipped = false;
        self.index = next_index(self.index, store.flashcard_count());
    }

    /// Move to the previous card, front side up.
    pub fn prev_card(&mut self, store: &ContentStore) {
        self.flipped = false;
        self.index = prev_index(self.index, store.flashcard_count());
    }

    pub fn current<'a>(&self, store: &'a ContentStore) -> Option<&'a ErrorItem> {
        store.flashcard_at(self.index)
    }

    /// "Card i of N" counter.
    pub fn position(&self, store: &ContentStore) -> String {
        format!("Card {} of {}", self.index + 1, store.flashcard_count())
    }
}
