//! Typed-text cycler.

use glyphfall_config::TypingConfig;
use glyphfall_core::Millis;

/// Output of one typing tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingStep {
    /// Text to display after this tick.
    pub text: String,
    /// Delay until the next tick.
    pub delay: Millis,
}

/// Types a phrase one character at a time, holds it, deletes it faster, then
/// moves on to the next phrase. Wraps around forever.
#[derive(Debug, Clone)]
pub struct TypingCycler {
    phrases: Vec<Vec<char>>,
    phrase_index: usize,
    char_count: usize,
    deleting: bool,
    type_ms: Millis,
    pause_ms: Millis,
    delete_ms: Millis,
    next_phrase_ms: Millis,
}

impl TypingCycler {
    /// Returns `None` when there are no phrases to type.
    pub fn new(config: &TypingConfig) -> Option<Self> {
        if config.phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases: config.phrases.iter().map(|p| p.chars().collect()).collect(),
            phrase_index: 0,
            char_count: 0,
            deleting: false,
            type_ms: config.type_ms,
            pause_ms: config.pause_ms,
            delete_ms: config.delete_ms,
            next_phrase_ms: config.next_phrase_ms,
        })
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Currently displayed prefix.
    pub fn text(&self) -> String {
        self.phrases[self.phrase_index][..self.char_count]
            .iter()
            .collect()
    }

    /// Advance by one character and return what to show next.
    pub fn tick(&mut self) -> TypingStep {
        let len = self.phrases[self.phrase_index].len();

        // An empty phrase is both full and deleted: one empty frame.
        if len == 0 {
            self.next_phrase();
            return TypingStep {
                text: String::new(),
                delay: self.next_phrase_ms,
            };
        }

        if !self.deleting {
            self.char_count = (self.char_count + 1).min(len);
            let text = self.text();
            if self.char_count == len {
                self.deleting = true;
                return TypingStep {
                    text,
                    delay: self.pause_ms,
                };
            }
            return TypingStep {
                text,
                delay: self.type_ms,
            };
        }

        self.char_count = self.char_count.saturating_sub(1);
        let text = self.text();
        if self.char_count == 0 {
            self.next_phrase();
            return TypingStep {
                text,
                delay: self.next_phrase_ms,
            };
        }
        TypingStep {
            text,
            delay: self.delete_ms,
        }
    }

    fn next_phrase(&mut self) {
        self.deleting = false;
        self.char_count = 0;
        self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
    }
}
