/*!
 * # Structural list operations
 *
 * Every operation here works on the flat block sequence through
 * [`BlockSequenceMut`]: it locates the affected blocks with the
 * [`ListWalker`](crate::walker::ListWalker) and the queries built on it,
 * rewrites list attributes, and mints fresh ids where a new item boundary
 * appears. None of them tries to leave a perfect structure behind: the
 * caller runs [`normalize`] after every batch, which is what guarantees
 * the list invariants.
 *
 * ## Modules
 *
 * - **`merge`**: join two blocks across an item boundary (Backspace/Delete)
 * - **`indent`**: indent and outdent items or a sub-range of one item
 * - **`split`**: start a new item inside an existing one (Enter)
 * - **`paste`**: insert a fragment rebased onto the caret item
 * - **`kind`**: toggle the list kind of the selected items
 * - **`normalize`**: the post-fixer
 */

pub mod indent;
pub mod kind;
pub mod merge;
pub mod normalize;
pub mod paste;
pub mod split;

pub use normalize::normalize;

use crate::model::{ListAttributes, Selection};
use crate::sequence::BlockSequenceMut;

/// What a structural operation did: the blocks whose list attributes it
/// changed, and where the caret should go afterwards (`None` keeps it)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub changed: Vec<usize>,
    pub selection: Option<Selection>,
}

impl Outcome {
    pub fn changed(changed: Vec<usize>) -> Self {
        Self {
            changed,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// Write attributes, recording the block only when they actually differ
pub(crate) fn stamp<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    index: usize,
    attributes: ListAttributes,
    changed: &mut Vec<usize>,
) {
    if seq.attributes(index) != Some(&attributes) {
        seq.set_attributes(index, attributes);
        changed.push(index);
    }
}

pub(crate) fn strip<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    index: usize,
    changed: &mut Vec<usize>,
) {
    if seq.is_list_block(index) {
        seq.remove_attributes(index);
        changed.push(index);
    }
}

/// Move a list block `delta` levels, stopping at level 0
pub(crate) fn shift_indent<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    index: usize,
    delta: isize,
    changed: &mut Vec<usize>,
) {
    if let Some(attrs) = seq.attributes(index) {
        let shifted = attrs.with_indent(attrs.indent.saturating_add_signed(delta));
        stamp(seq, index, shifted, changed);
    }
}

/// Clamp the list region that starts right after `from` so no block is
/// more than one level deeper than the list block before it
pub(crate) fn clamp_region_after<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    from: usize,
    changed: &mut Vec<usize>,
) {
    let mut previous = seq.indent(from);
    for index in from + 1..seq.len() {
        let Some(attrs) = seq.attributes(index) else {
            break;
        };
        let limit = previous.map_or(0, |indent| indent + 1);
        if attrs.indent > limit {
            let clamped = attrs.with_indent(limit);
            stamp(seq, index, clamped, changed);
        }
        previous = seq.indent(index);
    }
}

pub(crate) fn finish(mut changed: Vec<usize>) -> Vec<usize> {
    changed.sort_unstable();
    changed.dedup();
    changed
}
