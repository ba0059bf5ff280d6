//! Splitting one item into two at a block boundary.
//!
//! Blocks nested under the part that changes identity are left alone: they
//! keep their own ids and indents and simply belong to whichever run now
//! precedes them.

use crate::ids::{IdGenerator, mint_unused};
use crate::model::{Position, Selection};
use crate::queries::is_first_block_of_item;
use crate::sequence::BlockSequenceMut;
use crate::structure::{Outcome, stamp};
use crate::walker::{ListWalker, WalkOptions};

/// Move `block` and the rest of its item to a fresh id. Nothing happens when
/// `block` already starts its item.
pub fn split_before<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    block: usize,
    ids: &mut dyn IdGenerator,
) -> Vec<usize> {
    if !seq.is_list_block(block) || is_first_block_of_item(&*seq, block) {
        return Vec::new();
    }
    let moved: Vec<usize> = ListWalker::new(
        &*seq,
        block,
        WalkOptions::forward().include_self().same_indent().same_item_id(),
    )
    .collect();
    restamp(seq, &moved, ids)
}

/// Move the blocks after `block` in its item to a fresh id
pub fn split_after<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    block: usize,
    ids: &mut dyn IdGenerator,
) -> Vec<usize> {
    let moved: Vec<usize> = ListWalker::new(
        &*seq,
        block,
        WalkOptions::forward().same_indent().same_item_id(),
    )
    .collect();
    restamp(seq, &moved, ids)
}

/// Paragraph break at `at`. Inside an item the new block starts a sibling
/// item; in a plain block it is just a new plain block.
pub fn split_list_item<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    at: Position,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    seq.split_block(at);
    let changed = split_before(seq, at.block + 1, ids);
    Outcome::changed(changed).with_selection(Selection::caret(Position::new(at.block + 1, 0)))
}

fn restamp<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    blocks: &[usize],
    ids: &mut dyn IdGenerator,
) -> Vec<usize> {
    let Some(attrs) = blocks.first().and_then(|first| seq.attributes(*first)).cloned() else {
        return Vec::new();
    };

    let fresh = mint_unused(&*seq, ids);
    log::debug!(
        "split: {} block(s) of item {} moved to new item {fresh}",
        blocks.len(),
        attrs.item_id
    );

    let mut changed = Vec::new();
    let stamped = attrs.with_item_id(fresh);
    for index in blocks {
        stamp(seq, *index, stamped.clone(), &mut changed);
    }
    changed
}
