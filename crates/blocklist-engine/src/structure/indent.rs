//! Indent and outdent of the selected items.
//!
//! A selection covering whole items (or touching them anywhere) acts on those
//! items plus everything nested under them. A selection made only of
//! non-first blocks of a single item is split off into an item of its own
//! first, so Tab inside a multi-paragraph item nests just those paragraphs.

use std::ops::{Range, RangeInclusive};

use crate::ids::{IdGenerator, mint_unused};
use crate::model::Selection;
use crate::queries::{expand_to_items, item_run, with_nested};
use crate::sequence::{BlockSequence, BlockSequenceMut};
use crate::structure::split::split_before;
use crate::structure::{Outcome, finish, shift_indent, stamp, strip};
use crate::walker::{ListWalker, WalkOptions};

pub fn can_indent<S: BlockSequence + ?Sized>(seq: &S, selection: Selection) -> bool {
    if sub_range(seq, selection).is_some() {
        return true;
    }
    let Some(items) = expand_to_items(seq, selection.blocks()) else {
        return false;
    };
    // Needs something to nest under: a previous sibling, or a block nested
    // deeper than the first selected item
    ListWalker::first(
        seq,
        items.start,
        WalkOptions::backward().same_indent().higher_indent(),
    )
    .is_some()
}

/// Any selected list block can be outdented; at level 0 it leaves the list
pub fn can_outdent<S: BlockSequence + ?Sized>(seq: &S, selection: Selection) -> bool {
    selection.blocks().any(|index| seq.is_list_block(index))
}

pub fn indent<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    selection: Selection,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    if !can_indent(&*seq, selection) {
        return Outcome::default();
    }

    let mut changed = Vec::new();
    let Some(range) = affected_blocks(seq, selection, ids, &mut changed) else {
        return Outcome::default();
    };
    log::debug!("indent: blocks {range:?}");

    for index in range {
        shift_indent(seq, index, 1, &mut changed);
    }
    Outcome::changed(finish(changed))
}

pub fn outdent<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    selection: Selection,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    if !can_outdent(&*seq, selection) {
        return Outcome::default();
    }

    let mut changed = Vec::new();
    let Some(range) = affected_blocks(seq, selection, ids, &mut changed) else {
        return Outcome::default();
    };
    log::debug!("outdent: blocks {range:?}");

    let mut left_list = Vec::new();
    for index in range.clone() {
        match seq.indent(index) {
            Some(0) => {
                strip(seq, index, &mut changed);
                left_list.push(index);
            }
            Some(_) => shift_indent(seq, index, -1, &mut changed),
            None => {}
        }
    }

    // A block that was nested directly under a run leaving the list now
    // starts a list region of its own
    for index in left_list {
        let promoted = index + 1;
        if !range.contains(&promoted) || !seq.is_list_block(promoted) {
            continue;
        }
        let Some(run) = item_run(&*seq, promoted) else {
            continue;
        };
        let fresh = mint_unused(&*seq, ids);
        for block in run {
            if let Some(attrs) = seq.attributes(block) {
                let stamped = attrs.with_item_id(fresh.clone());
                stamp(seq, block, stamped, &mut changed);
            }
        }
    }

    Outcome::changed(finish(changed))
}

/// Selected blocks, when they are all non-first blocks of one item
fn sub_range<S: BlockSequence + ?Sized>(
    seq: &S,
    selection: Selection,
) -> Option<RangeInclusive<usize>> {
    let blocks = selection.blocks();
    let run = item_run(seq, *blocks.start())?;
    (run.start < *blocks.start() && *blocks.end() < run.end).then_some(blocks)
}

/// The blocks an indent or outdent moves. A sub-range of one item is split
/// off into its own item on the way.
fn affected_blocks<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    selection: Selection,
    ids: &mut dyn IdGenerator,
    changed: &mut Vec<usize>,
) -> Option<Range<usize>> {
    if let Some(blocks) = sub_range(&*seq, selection) {
        let (first, last) = (*blocks.start(), *blocks.end());
        changed.extend(split_before(seq, first, ids));
        if seq.item_id(last + 1).is_some() && seq.item_id(last + 1) == seq.item_id(last) {
            changed.extend(split_before(seq, last + 1, ids));
        }
        return Some(with_nested(&*seq, first..last + 1));
    }

    let items = expand_to_items(&*seq, selection.blocks())?;
    Some(with_nested(&*seq, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use crate::fixture;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn applied(lines: &[&str], cmd: Cmd) -> Vec<String> {
        let mut doc = fixture::parse(lines).unwrap();
        doc.apply(cmd);
        fixture::stringify_with_selection(&doc)
    }

    #[rstest]
    #[case::second_sibling(&["* a", "* []b"], true)]
    #[case::first_item(&["* []a", "* b"], false)]
    #[case::first_child(&["* a", "  * []b"], false)]
    #[case::after_nested_child(&["* a", "  * a1", "* []b"], true)]
    #[case::continuation_block(&["* a", "  []a2"], true)]
    #[case::plain_block(&["* a", "[]para"], false)]
    fn indent_needs_a_predecessor(#[case] lines: &[&str], #[case] expected: bool) {
        let doc = fixture::parse(lines).unwrap();

        assert_eq!(can_indent(doc.blocks(), doc.selection()), expected);
    }

    #[test]
    fn outdent_enabled_for_any_list_block() {
        let doc = fixture::parse(&["para[", "* a]"]).unwrap();
        assert!(can_outdent(doc.blocks(), doc.selection()));

        let doc = fixture::parse(&["[]para", "* a"]).unwrap();
        assert!(!can_outdent(doc.blocks(), doc.selection()));
    }

    #[test]
    fn indent_nests_item_under_previous_sibling() {
        assert_eq!(
            applied(&["* A", "* B[]"], Cmd::Indent),
            vec!["* A {id:000}", "  * B[] {id:001}"]
        );
    }

    #[test]
    fn indent_carries_nested_blocks_along() {
        assert_eq!(
            applied(&["* a", "* [b", "  * b1", "* c]", "* d"], Cmd::Indent),
            vec![
                "* a {id:000}",
                "  * [b {id:001}",
                "    * b1 {id:002}",
                "  * c] {id:003}",
                "* d {id:004}",
            ]
        );
    }

    #[test]
    fn indent_of_continuation_block_splits_it_off() {
        assert_eq!(
            applied(&["* a", "  []a2", "  a3"], Cmd::Indent),
            vec!["* a {id:000}", "  * []a2 {id:a00}", "* a3 {id:a01}"]
        );
    }

    #[test]
    fn disabled_indent_is_a_no_op() {
        let mut doc = fixture::parse(&["* []a"]).unwrap();

        let patch = doc.apply(Cmd::Indent);

        assert!(patch.changed.is_empty());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn outdent_sole_top_level_item_leaves_the_list() {
        assert_eq!(applied(&["* A[]"], Cmd::Outdent), vec!["A[]"]);
    }

    #[test]
    fn outdent_moves_nested_item_up_a_level() {
        assert_eq!(
            applied(&["* a", "  * []b", "    * c", "  * d"], Cmd::Outdent),
            vec!["* a {id:000}", "* []b {id:001}", "  * c {id:002}", "  * d {id:003}"]
        );
    }

    #[test]
    fn outdent_out_of_list_promotes_first_child() {
        assert_eq!(
            applied(&["* []a", "  * b", "    * c"], Cmd::Outdent),
            vec!["[]a", "* b {id:a00}", "  * c {id:002}"]
        );
    }

    #[test]
    fn outdent_of_continuation_block_leaves_rest_of_item_listed() {
        assert_eq!(
            applied(&["* a", "  []a2", "  a3"], Cmd::Outdent),
            vec!["* a {id:000}", "[]a2", "* a3 {id:a01}"]
        );
    }
}
