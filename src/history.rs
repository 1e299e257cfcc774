//! Question/answer turns and the ordered history they form.
//!
//! The serialized form is a plain JSON array of `{ "question", "answer" }`
//! objects, so a history written by one session can be read back by the next.

use serde::{Deserialize, Serialize};

/// One question/answer pair accepted by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// First `max_chars` characters of the question, followed by `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        let head: String = self.question.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// Turns in submission order. Nothing is ever reordered or dropped except by
/// clearing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<Turn>);

impl History {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Turn> {
        self.0.iter()
    }

    /// Newest first, paired with each turn's chronological index.
    pub fn recent_first(&self) -> impl Iterator<Item = (usize, &Turn)> {
        self.0.iter().enumerate().rev()
    }
}

impl From<Vec<Turn>> for History {
    fn from(turns: Vec<Turn>) -> Self {
        Self(turns)
    }
}
