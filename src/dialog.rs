//! Single-line text prompt driven by the event loop.
//!
//! A prompt never blocks: each key is fed through [`Prompt::handle_key`]
//! and the caller acts once the outcome is `Submitted` or `Cancelled`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Submitted(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    label: String,
    buffer: Vec<char>,
    cursor: usize,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_value(label, "")
    }

    /// A prompt pre-filled with `value`, cursor at the end.
    pub fn with_value(label: impl Into<String>, value: &str) -> Self {
        let buffer: Vec<char> = value.chars().collect();
        Self {
            label: label.into(),
            cursor: buffer.len(),
            buffer,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position in characters from the start of the value.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => return PromptOutcome::Cancelled,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return PromptOutcome::Cancelled
            }
            KeyCode::Enter => return PromptOutcome::Submitted(self.value()),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => {}
        }
        PromptOutcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle_key(key(KeyCode::Char(c))), PromptOutcome::Pending);
        }
    }

    #[test]
    fn typing_and_submit() {
        let mut prompt = Prompt::new("Title");
        type_str(&mut prompt, "Buy mlk");
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Left));
        type_str(&mut prompt, "i");

        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptOutcome::Submitted("Buy milk".to_string())
        );
    }

    #[test]
    fn prefilled_value_is_editable() {
        let mut prompt = Prompt::with_value("Title", "café");
        assert_eq!(prompt.cursor(), 4);
        prompt.handle_key(key(KeyCode::Backspace));
        prompt.handle_key(key(KeyCode::Home));
        prompt.handle_key(key(KeyCode::Delete));
        assert_eq!(prompt.value(), "af");
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut prompt = Prompt::with_value("Title", "keep");
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), PromptOutcome::Cancelled);
        assert_eq!(
            prompt.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            PromptOutcome::Cancelled
        );
        assert_eq!(prompt.value(), "keep");
    }
}
