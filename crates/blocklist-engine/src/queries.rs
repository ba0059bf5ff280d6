//! Structural lookups over the flat block sequence.
//!
//! Item runs are contiguous by definition, so they are found by scanning
//! neighbours directly. Everything level-relative (parents, siblings, nested
//! descendants) goes through [`ListWalker`].

use std::ops::{Range, RangeInclusive};

use crate::sequence::BlockSequence;
use crate::walker::{ListWalker, WalkOptions};

/// All blocks of the item containing `index`: the maximal contiguous run of
/// blocks sharing its id
pub fn item_run<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> Option<Range<usize>> {
    let id = seq.item_id(index)?;
    let mut start = index;
    while start > 0 && seq.item_id(start - 1) == Some(id) {
        start -= 1;
    }
    let mut end = index + 1;
    while end < seq.len() && seq.item_id(end) == Some(id) {
        end += 1;
    }
    Some(start..end)
}

pub fn item_start<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> Option<usize> {
    item_run(seq, index).map(|run| run.start)
}

pub fn is_first_block_of_item<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> bool {
    item_start(seq, index) == Some(index)
}

pub fn is_last_block_of_item<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> bool {
    item_run(seq, index).is_some_and(|run| run.end == index + 1)
}

/// Blocks nested under the item containing `index`, i.e. the contiguous
/// deeper-indented blocks following its run. Empty for non-list blocks.
pub fn nested_blocks<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> Range<usize> {
    let Some(run) = item_run(seq, index) else {
        return index + 1..index + 1;
    };
    let count = ListWalker::new(seq, run.end - 1, WalkOptions::forward().higher_indent()).count();
    run.end..run.end + count
}

/// First block of the parent item
pub fn parent<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> Option<usize> {
    let indent = seq.indent(index)?;
    let options = WalkOptions::backward().same_indent().lower_indent();
    let last_block = ListWalker::new(seq, index, options)
        .find(|candidate| seq.indent(*candidate).is_some_and(|other| other < indent))?;
    item_start(seq, last_block)
}

/// First block of the previous item on the same level under the same parent
pub fn previous_sibling<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> Option<usize> {
    let start = item_start(seq, index)?;
    let last_block = ListWalker::first(seq, start, WalkOptions::backward().same_indent())?;
    item_start(seq, last_block)
}

/// 1-based position of the item among its consecutive same-kind siblings,
/// used to number ordered lists
pub fn ordinal<S: BlockSequence + ?Sized>(seq: &S, index: usize) -> usize {
    let Some(start) = item_start(seq, index) else {
        return 0;
    };

    let mut count = 1;
    let mut current = seq.item_id(start);
    for sibling in ListWalker::new(
        seq,
        start,
        WalkOptions::backward().same_indent().same_item_kind(),
    ) {
        if seq.item_id(sibling) != current {
            count += 1;
            current = seq.item_id(sibling);
        }
    }
    count
}

/// Indices of list blocks inside `blocks`
pub fn list_blocks_in<S: BlockSequence + ?Sized>(
    seq: &S,
    blocks: RangeInclusive<usize>,
) -> Vec<usize> {
    blocks
        .filter(|index| seq.is_list_block(*index))
        .collect()
}

/// Widen a block selection so it covers complete items: from the start of the
/// first selected list block's item to the end of the last one's
pub fn expand_to_items<S: BlockSequence + ?Sized>(
    seq: &S,
    blocks: RangeInclusive<usize>,
) -> Option<Range<usize>> {
    let selected = list_blocks_in(seq, blocks);
    let first = item_run(seq, *selected.first()?)?;
    let last = item_run(seq, *selected.last()?)?;
    Some(first.start..last.end)
}

/// Extend a range of complete items with the blocks nested under its last item
pub fn with_nested<S: BlockSequence + ?Sized>(seq: &S, items: Range<usize>) -> Range<usize> {
    if items.is_empty() {
        return items;
    }
    let nested = nested_blocks(seq, items.end - 1);
    items.start..nested.end.max(items.end)
}
