use std::fmt;

use crate::editing::history::{Checkpoint, History};
use crate::editing::{Cmd, Patch, commands};
use crate::ids::{IdGenerator, UuidIds};
use crate::model::{Block, ListAttributes, Position, Selection};
use crate::sequence::BlockSequence;
use crate::structure;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("position {block}:{offset} is outside the document")]
    PositionOutOfRange { block: usize, offset: usize },
}

/// In-memory block sequence driven through [`Cmd`]s.
///
/// The document always holds at least one block, and its blocks satisfy the
/// list invariants whenever control is outside [`Document::apply`],
/// [`Document::undo`] or [`Document::redo`].
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) selection: Selection,
    /// Incremented on every applied edit batch
    pub(crate) version: u64,
    /// Source of ids for items the engine creates
    pub(crate) ids: Box<dyn IdGenerator>,
    history: History,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("blocks", &self.blocks)
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Wrap blocks as they are. An empty list becomes one empty plain block.
    pub fn new(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::default());
        }
        Self {
            blocks,
            selection: Selection::default(),
            version: 0,
            ids: Box::new(UuidIds),
            history: History::default(),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), DocumentError> {
        for position in [selection.anchor, selection.focus] {
            if !self.contains(position) {
                return Err(DocumentError::PositionOutOfRange {
                    block: position.block,
                    offset: position.offset,
                });
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Whether `position` addresses a caret slot of an existing block
    pub fn contains(&self, position: Position) -> bool {
        self.blocks
            .get(position.block)
            .is_some_and(|block| position.offset <= block.len())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_enabled(&self, cmd: &Cmd) -> bool {
        commands::is_enabled(self, cmd)
    }

    /// Run one edit batch: execute the command, normalize, record undo
    /// state. A command that is not enabled leaves the document untouched
    /// and returns a patch with nothing changed.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        if !self.is_enabled(&cmd) {
            log::debug!("ignoring disabled command {cmd:?}");
            return Patch {
                changed: Vec::new(),
                new_selection: self.selection,
                version: self.version,
            };
        }

        log::debug!("applying {cmd:?}");
        let before = self.checkpoint();
        let outcome = commands::execute(self, &cmd);
        let patch = self.finish_batch(outcome.changed, outcome.selection);

        if self.blocks != before.blocks {
            self.history.record(before);
        }
        patch
    }

    /// Run the post-fixer on its own. Returns the blocks it changed.
    pub fn normalize(&mut self) -> Vec<usize> {
        let changed = structure::normalize(&mut self.blocks, self.ids.as_mut());
        if !changed.is_empty() {
            self.version += 1;
        }
        changed
    }

    pub fn undo(&mut self) -> Option<Patch> {
        let previous = self.history.undo(self.checkpoint())?;
        log::debug!("undo to version {}", self.version + 1);
        Some(self.restore(previous))
    }

    pub fn redo(&mut self) -> Option<Patch> {
        let next = self.history.redo(self.checkpoint())?;
        log::debug!("redo to version {}", self.version + 1);
        Some(self.restore(next))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            blocks: self.blocks.clone(),
            selection: self.selection,
        }
    }

    /// Undo and redo replay a recorded state through the normal pipeline
    fn restore(&mut self, state: Checkpoint) -> Patch {
        let changed = attribute_changes(&self.blocks, &state.blocks);
        self.blocks = state.blocks;
        self.finish_batch(changed, Some(state.selection))
    }

    fn finish_batch(&mut self, mut changed: Vec<usize>, selection: Option<Selection>) -> Patch {
        if self.blocks.is_empty() {
            self.blocks.push(Block::default());
        }

        changed.extend(structure::normalize(&mut self.blocks, self.ids.as_mut()));
        changed.retain(|index| *index < self.blocks.len());
        changed.sort_unstable();
        changed.dedup();

        let selection = selection.unwrap_or(self.selection);
        self.selection =
            Selection::range(self.clamp(selection.anchor), self.clamp(selection.focus));
        self.version += 1;

        Patch {
            changed,
            new_selection: self.selection,
            version: self.version,
        }
    }

    fn clamp(&self, position: Position) -> Position {
        let block = position.block.min(self.blocks.len().saturating_sub(1));
        let offset = self.blocks.get(block).map_or(0, |b| position.offset.min(b.len()));
        Position::new(block, offset)
    }
}

/// Indices of `new` whose list attributes differ from the block at the same
/// index in `old`
fn attribute_changes(old: &[Block], new: &[Block]) -> Vec<usize> {
    new.iter()
        .enumerate()
        .filter(|(index, block)| {
            old.get(*index).map(|previous| &previous.list) != Some(&block.list)
        })
        .map(|(index, _)| index)
        .collect()
}

impl BlockSequence for Document {
    fn len(&self) -> usize {
        self.blocks.len()
    }

    fn attributes(&self, index: usize) -> Option<&ListAttributes> {
        self.blocks.as_slice().attributes(index)
    }

    fn content_len(&self, index: usize) -> usize {
        self.blocks.as_slice().content_len(index)
    }
}
