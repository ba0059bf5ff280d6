//! Post-fixer restoring the list invariants after an arbitrary edit batch.
//!
//! Two passes, always in this order:
//!
//! 1. **Indent clamp**: scanning left to right, a list block may be at most one
//!    level deeper than the previous list block; the first list block of a
//!    region (document start, or right after a non-list block) is at level 0.
//! 2. **Contiguity and uniformity**: an id reappearing after its run was
//!    closed, or a block whose indent or kind disagrees with its run, moves
//!    to a freshly minted id together with the contiguous blocks agreeing
//!    with it.
//!
//! Clamping runs first, so a block that is both too deep and part of a
//! run ends up split off at its clamped indent. Neither pass can undo the
//! other's work, which makes the whole normalization idempotent.

use std::collections::HashSet;

use crate::ids::{IdGenerator, mint_unused};
use crate::model::{ItemId, ListAttributes};
use crate::sequence::BlockSequenceMut;

/// Run both passes. Returns indices of blocks whose attributes changed, in
/// ascending order.
pub fn normalize<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    ids: &mut dyn IdGenerator,
) -> Vec<usize> {
    let mut changed = clamp_indents(seq);
    changed.extend(fix_item_runs(seq, ids));
    changed.sort_unstable();
    changed.dedup();
    changed
}

fn clamp_indents<S: BlockSequenceMut + ?Sized>(seq: &mut S) -> Vec<usize> {
    let mut changed = Vec::new();
    let mut previous: Option<usize> = None;

    for index in 0..seq.len() {
        let Some(attrs) = seq.attributes(index) else {
            previous = None;
            continue;
        };

        let limit = previous.map_or(0, |indent| indent + 1);
        if attrs.indent > limit {
            log::debug!(
                "normalize: block {index} indent {} clamped to {limit}",
                attrs.indent
            );
            let clamped = attrs.with_indent(limit);
            seq.set_attributes(index, clamped);
            changed.push(index);
        }
        previous = seq.indent(index);
    }

    changed
}

/// The run currently being scanned
struct OpenRun {
    /// Id the blocks carried before this pass
    original: ItemId,
    /// Attributes every block of the run ends up with
    stamped: ListAttributes,
}

fn fix_item_runs<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    ids: &mut dyn IdGenerator,
) -> Vec<usize> {
    let mut changed = Vec::new();
    let mut closed: HashSet<ItemId> = HashSet::new();
    let mut open: Option<OpenRun> = None;

    for index in 0..seq.len() {
        let Some(attrs) = seq.attributes(index).cloned() else {
            if let Some(run) = open.take() {
                closed.insert(run.original);
                closed.insert(run.stamped.item_id);
            }
            continue;
        };

        if let Some(run) = &open
            && run.original == attrs.item_id
        {
            if run.stamped.same_shape(&attrs) {
                if run.stamped.item_id != attrs.item_id {
                    seq.set_attributes(index, run.stamped.clone());
                    changed.push(index);
                }
                continue;
            }

            // Same id, different indent or kind: split into a new run
            let fresh = mint_unused(&*seq, ids);
            log::debug!(
                "normalize: block {index} disagrees with item {}; moved to new item {fresh}",
                attrs.item_id
            );
            let stamped = attrs.with_item_id(fresh);
            seq.set_attributes(index, stamped.clone());
            changed.push(index);
            if let Some(previous) = open.replace(OpenRun {
                original: attrs.item_id,
                stamped,
            }) {
                closed.insert(previous.stamped.item_id);
            }
            continue;
        }

        if let Some(previous) = open.take() {
            closed.insert(previous.original);
            closed.insert(previous.stamped.item_id);
        }

        let stamped = if closed.contains(&attrs.item_id) {
            let fresh = mint_unused(&*seq, ids);
            log::debug!(
                "normalize: item {} reappears at block {index}; moved to new item {fresh}",
                attrs.item_id
            );
            let stamped = attrs.with_item_id(fresh);
            seq.set_attributes(index, stamped.clone());
            changed.push(index);
            stamped
        } else {
            attrs.clone()
        };

        open = Some(OpenRun {
            original: attrs.item_id,
            stamped,
        });
    }

    changed
}
