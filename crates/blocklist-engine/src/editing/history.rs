use std::collections::VecDeque;

use crate::model::{Block, Selection};

/// Undo steps kept before the oldest is dropped
const MAX_DEPTH: usize = 200;

/// Document state before an edit batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub blocks: Vec<Block>,
    pub selection: Selection,
}

#[derive(Debug, Default)]
pub(crate) struct History {
    /// Oldest step at the front
    undo: VecDeque<Checkpoint>,
    redo: Vec<Checkpoint>,
}

impl History {
    /// A new edit invalidates everything that could have been redone
    pub fn record(&mut self, before: Checkpoint) {
        self.undo.push_back(before);
        if self.undo.len() > MAX_DEPTH {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    pub fn undo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
