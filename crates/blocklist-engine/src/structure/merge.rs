//! Joining two blocks across an item boundary: Backspace at the start of an
//! item, Delete at the end of one, or deleting a selection that spans items.
//!
//! The host join itself is [`BlockSequenceMut::delete_content`]; this module
//! decides which item the joined content ends up in and re-stamps the rest
//! of the absorbed item so it continues the surviving one.

use std::collections::{HashMap, HashSet};

use crate::ids::{IdGenerator, mint_unused};
use crate::model::{ItemId, Position, Selection};
use crate::queries::{is_first_block_of_item, item_run, nested_blocks};
use crate::sequence::{BlockSequence, BlockSequenceMut};
use crate::structure::{Outcome, clamp_region_after, finish, shift_indent, stamp, strip};
use crate::walker::{Direction, ListWalker, WalkOptions};

/// Whether erasing the boundary at the selection would splice blocks of two
/// different items (or a list block and a plain one) together.
pub fn is_enabled<S: BlockSequence + ?Sized>(
    seq: &S,
    selection: Selection,
    direction: Direction,
) -> bool {
    if !selection.is_collapsed() {
        let (start, end) = (selection.start(), selection.end());
        return start.block < end.block
            && end.block < seq.len()
            && (start.block..=end.block).any(|index| seq.is_list_block(index));
    }

    let at = selection.focus;
    if at.block >= seq.len() {
        return false;
    }

    match direction {
        Direction::Backward => {
            if at.offset != 0 {
                return false;
            }
            if seq.is_list_block(at.block) {
                is_first_block_of_item(seq, at.block)
            } else {
                at.block > 0 && seq.is_list_block(at.block - 1)
            }
        }
        Direction::Forward => {
            let next = at.block + 1;
            if at.offset < seq.content_len(at.block) || next >= seq.len() {
                return false;
            }
            match (seq.item_id(at.block), seq.item_id(next)) {
                (Some(current), Some(following)) => current != following,
                (None, None) => false,
                _ => true,
            }
        }
    }
}

/// Merge at the selection. A no-op when [`is_enabled`] is false.
pub fn merge<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    selection: Selection,
    direction: Direction,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    if !is_enabled(&*seq, selection, direction) {
        return Outcome::default();
    }
    if !selection.is_collapsed() {
        return merge_range(seq, selection.start(), selection.end(), ids);
    }

    match direction {
        Direction::Backward => merge_backward(seq, selection.focus.block),
        Direction::Forward => merge_forward(seq, selection.focus.block),
    }
}

fn merge_backward<S: BlockSequenceMut + ?Sized>(seq: &mut S, cur: usize) -> Outcome {
    let mut changed = Vec::new();

    let Some(current) = seq.attributes(cur).cloned() else {
        // Plain block following a list block: the join alone moves its
        // content into the item
        let previous = cur - 1;
        let join_at = Position::new(previous, seq.content_len(previous));
        seq.delete_content(join_at, Position::new(cur, 0));
        return Outcome::default().with_selection(Selection::caret(join_at));
    };

    let target = ListWalker::first(&*seq, cur, WalkOptions::backward().any_indent());
    let Some(target_attrs) = target.and_then(|index| seq.attributes(index)).cloned() else {
        log::debug!("merge backward: no list block before {cur}; block leaves the list");
        strip(seq, cur, &mut changed);
        return Outcome::changed(changed);
    };
    // The walk ends at the first non-list block, so the target is always
    // the block right before `cur`
    let target = cur - 1;

    if seq.content_len(target) == 0 && item_run(&*seq, target).is_some_and(|run| run.len() == 1) {
        log::debug!("merge backward: removing empty item {}", target_attrs.item_id);
        seq.remove_blocks(target..target + 1);
        return Outcome::default().with_selection(Selection::caret(Position::new(target, 0)));
    }

    let run = item_run(&*seq, cur).unwrap_or(cur..cur + 1);
    let nested = nested_blocks(&*seq, cur);
    let delta = target_attrs.indent as isize - current.indent as isize;

    let join_at = Position::new(target, seq.content_len(target));
    seq.delete_content(join_at, Position::new(cur, 0));

    // Everything after the joined block moved up by one
    for index in run.start..run.end - 1 {
        stamp(seq, index, target_attrs.clone(), &mut changed);
    }
    for index in nested.start - 1..nested.end - 1 {
        shift_indent(seq, index, delta, &mut changed);
    }

    log::debug!(
        "merge backward: item {} absorbed into {}",
        current.item_id,
        target_attrs.item_id
    );
    Outcome::changed(finish(changed)).with_selection(Selection::caret(join_at))
}

fn merge_forward<S: BlockSequenceMut + ?Sized>(seq: &mut S, cur: usize) -> Outcome {
    let mut changed = Vec::new();
    let next = cur + 1;
    let join_at = Position::new(cur, seq.content_len(cur));
    let caret = Selection::caret(join_at);

    let (Some(current), Some(following)) = (
        seq.attributes(cur).cloned(),
        seq.attributes(next).cloned(),
    ) else {
        // One side is a plain block: the join is all there is to do
        seq.delete_content(join_at, Position::new(next, 0));
        return Outcome::default().with_selection(caret);
    };

    if seq.content_len(cur) == 0 && item_run(&*seq, cur).is_some_and(|run| run.len() == 1) {
        log::debug!("merge forward: removing empty item {}", current.item_id);
        seq.remove_blocks(cur..cur + 1);
        return Outcome::default().with_selection(Selection::caret(Position::new(cur, 0)));
    }

    let run = item_run(&*seq, next).unwrap_or(next..next + 1);
    let nested = nested_blocks(&*seq, next);
    let delta = current.indent as isize - following.indent as isize;

    seq.delete_content(join_at, Position::new(next, 0));

    for index in run.start..run.end - 1 {
        stamp(seq, index, current.clone(), &mut changed);
    }
    for index in nested.start - 1..nested.end - 1 {
        shift_indent(seq, index, delta, &mut changed);
    }

    log::debug!(
        "merge forward: item {} absorbed into {}",
        following.item_id,
        current.item_id
    );
    Outcome::changed(finish(changed)).with_selection(caret)
}

fn merge_range<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    start: Position,
    end: Position,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    let mut changed = Vec::new();
    let survivor = seq.attributes(start.block).cloned();
    let last = seq.attributes(end.block).cloned();

    let tail = item_run(&*seq, end.block)
        .map_or(end.block + 1..end.block + 1, |run| end.block + 1..run.end);
    let nested = nested_blocks(&*seq, end.block);

    // Items whose blocks inside the selection are going away
    let mut removed: HashSet<ItemId> = (start.block + 1..=end.block)
        .filter_map(|index| seq.item_id(index).cloned())
        .collect();
    for attrs in survivor.iter().chain(last.iter()) {
        removed.remove(&attrs.item_id);
    }

    seq.delete_content(start, end);
    let gone = end.block - start.block;

    if let Some(survivor) = &survivor {
        for index in tail.start - gone..tail.end - gone {
            stamp(seq, index, survivor.clone(), &mut changed);
        }
        if let Some(last) = &last {
            let delta = survivor.indent as isize - last.indent as isize;
            for index in nested.start - gone..nested.end - gone {
                shift_indent(seq, index, delta, &mut changed);
            }
        }
    }

    // Descendants of removed items reattach to the survivor
    clamp_region_after(seq, start.block, &mut changed);

    // Only reachable on sequences that break contiguity, e.g. a raw host
    // buffer merged before it was normalized
    if !removed.is_empty() {
        let mut replacements: HashMap<ItemId, ItemId> = HashMap::new();
        for index in start.block + 1..seq.len() {
            let Some(attrs) = seq.attributes(index).cloned() else {
                continue;
            };
            if !removed.contains(&attrs.item_id) {
                continue;
            }
            let fresh = match replacements.get(&attrs.item_id) {
                Some(fresh) => fresh.clone(),
                None => {
                    let fresh = mint_unused(&*seq, ids);
                    replacements.insert(attrs.item_id.clone(), fresh.clone());
                    fresh
                }
            };
            stamp(seq, index, attrs.with_item_id(fresh), &mut changed);
        }
    }

    log::debug!(
        "merge range: blocks {}..={} joined into {}",
        start.block,
        end.block,
        start.block
    );
    Outcome::changed(finish(changed)).with_selection(Selection::caret(start))
}
