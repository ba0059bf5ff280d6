use std::ops::Range;

use crate::editing::Document;
use crate::fragment::Fragment;
use crate::ids::IdGenerator;
use crate::model::{Block, ListAttributes, ListKind, Position, Selection, block::byte_offset};
use crate::sequence::{BlockSequence, BlockSequenceMut};
use crate::structure::{Outcome, indent, kind, merge, paste, split};
use crate::walker::Direction;

/// Commands that can be applied to the document
///
/// The structural commands act on the document selection. The raw edits
/// stand in for changes the engine does not drive itself and are
/// normalized like everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Backspace at the start of a block, or over a range
    MergeBackward,
    /// Delete at the end of a block, or over a range
    MergeForward,
    Indent,
    Outdent,
    /// Enter inside a list item
    SplitListItem {
        at: Position,
    },
    SplitBefore {
        block: usize,
    },
    SplitAfter {
        block: usize,
    },
    /// Make the selected blocks items of `kind`, or plain blocks when they
    /// already all are
    ToggleList {
        kind: ListKind,
    },
    /// Insert a fragment at the caret, replacing any selected range
    Paste {
        fragment: Fragment,
    },
    InsertText {
        at: Position,
        text: String,
    },
    DeleteContent {
        start: Position,
        end: Position,
    },
    SetAttributes {
        block: usize,
        attributes: Option<ListAttributes>,
    },
    InsertBlock {
        at: usize,
        block: Block,
    },
    RemoveBlocks {
        range: Range<usize>,
    },
}

pub(crate) fn is_enabled(doc: &Document, cmd: &Cmd) -> bool {
    let selection = doc.selection();
    match cmd {
        Cmd::MergeBackward => merge::is_enabled(doc, selection, Direction::Backward),
        Cmd::MergeForward => merge::is_enabled(doc, selection, Direction::Forward),
        Cmd::Indent => indent::can_indent(doc, selection),
        Cmd::Outdent => indent::can_outdent(doc, selection),
        Cmd::SplitListItem { at } => doc.contains(*at),
        Cmd::SplitBefore { block } | Cmd::SplitAfter { block } => *block < doc.len(),
        Cmd::ToggleList { .. } => true,
        Cmd::Paste { fragment } => !fragment.is_empty(),
        Cmd::InsertText { at, text } => doc.contains(*at) && !text.is_empty(),
        Cmd::DeleteContent { start, end } => {
            doc.contains(*start) && doc.contains(*end) && start < end
        }
        Cmd::SetAttributes { block, .. } => *block < doc.len(),
        Cmd::InsertBlock { at, .. } => *at <= doc.len(),
        Cmd::RemoveBlocks { range } => range.start < range.end && range.end <= doc.len(),
    }
}

/// Perform the edit. The caller has already checked [`is_enabled`] and runs
/// the post-fixer afterwards.
pub(crate) fn execute(doc: &mut Document, cmd: &Cmd) -> Outcome {
    let selection = doc.selection;
    let blocks = &mut doc.blocks;
    let ids = doc.ids.as_mut();

    match cmd {
        Cmd::MergeBackward => merge::merge(blocks, selection, Direction::Backward, ids),
        Cmd::MergeForward => merge::merge(blocks, selection, Direction::Forward, ids),
        Cmd::Indent => indent::indent(blocks, selection, ids),
        Cmd::Outdent => indent::outdent(blocks, selection, ids),
        Cmd::SplitListItem { at } => split::split_list_item(blocks, *at, ids),
        Cmd::SplitBefore { block } => Outcome::changed(split::split_before(blocks, *block, ids)),
        Cmd::SplitAfter { block } => Outcome::changed(split::split_after(blocks, *block, ids)),
        Cmd::ToggleList { kind } => kind::toggle_list(blocks, selection, kind, ids),
        Cmd::Paste { fragment } => paste_over(blocks, selection, fragment, ids),
        Cmd::InsertText { at, text } => {
            insert_text(blocks, *at, text);
            let caret = Position::new(at.block, at.offset + text.chars().count());
            Outcome::default().with_selection(Selection::caret(caret))
        }
        Cmd::DeleteContent { start, end } => {
            blocks.delete_content(*start, *end);
            Outcome::default().with_selection(Selection::caret(*start))
        }
        Cmd::SetAttributes { block, attributes } => {
            match attributes {
                Some(attributes) => blocks.set_attributes(*block, attributes.clone()),
                None => blocks.remove_attributes(*block),
            }
            Outcome::changed(vec![*block])
        }
        Cmd::InsertBlock { at, block } => {
            let is_list = block.list.is_some();
            blocks.insert_block(*at, block.clone());
            Outcome::changed(if is_list { vec![*at] } else { Vec::new() })
        }
        Cmd::RemoveBlocks { range } => {
            blocks.remove_blocks(range.clone());
            Outcome::default().with_selection(Selection::caret(Position::new(range.start, 0)))
        }
    }
}

/// A selected range is removed first, through a range merge when it crosses
/// list structure
fn paste_over(
    blocks: &mut Vec<Block>,
    selection: Selection,
    fragment: &Fragment,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    let mut changed = Vec::new();
    let at = selection.start();
    if !selection.is_collapsed() {
        if merge::is_enabled(&*blocks, selection, Direction::Backward) {
            changed = merge::merge(blocks, selection, Direction::Backward, ids).changed;
        } else {
            blocks.delete_content(at, selection.end());
        }
    }

    let mut outcome = paste::paste(blocks, at, fragment, ids);
    outcome.changed.extend(changed);
    outcome
}

fn insert_text(blocks: &mut [Block], at: Position, text: &str) {
    if let Some(block) = blocks.get_mut(at.block) {
        let index = byte_offset(&block.content, at.offset);
        block.content.insert_str(index, text);
    }
}
