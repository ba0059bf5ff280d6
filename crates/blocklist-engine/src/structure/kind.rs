//! Switching the selected blocks into or out of a list kind.

use crate::ids::{IdGenerator, mint_unused};
use crate::model::{ListAttributes, ListKind, Selection};
use crate::queries::item_run;
use crate::sequence::BlockSequenceMut;
use crate::structure::{Outcome, finish, stamp, strip};

/// When every selected block already is a list block of `kind`, the
/// selected items leave the list. Otherwise selected items switch to `kind`
/// (all of their blocks, so kinds stay uniform per item) and selected plain
/// blocks become top-level items of their own.
pub fn toggle_list<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    selection: Selection,
    kind: &ListKind,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    let blocks = selection.start().block..(selection.end().block + 1).min(seq.len());
    if blocks.is_empty() {
        return Outcome::default();
    }

    let mut changed = Vec::new();
    let all_of_kind = blocks
        .clone()
        .all(|index| seq.attributes(index).is_some_and(|attrs| &attrs.kind == kind));

    if all_of_kind {
        log::debug!("toggle list: blocks {blocks:?} leave the {kind:?} list");
        let runs: Vec<_> = blocks.filter_map(|index| item_run(&*seq, index)).collect();
        for run in runs {
            for index in run {
                strip(seq, index, &mut changed);
            }
        }
        return Outcome::changed(finish(changed));
    }

    log::debug!("toggle list: blocks {blocks:?} become {kind:?}");
    for index in blocks {
        if seq.is_list_block(index) {
            let Some(run) = item_run(&*seq, index) else {
                continue;
            };
            for block in run {
                if let Some(attrs) = seq.attributes(block) {
                    let switched = ListAttributes {
                        kind: kind.clone(),
                        ..attrs.clone()
                    };
                    stamp(seq, block, switched, &mut changed);
                }
            }
        } else {
            let fresh = mint_unused(&*seq, ids);
            stamp(seq, index, ListAttributes::new(fresh, 0, kind.clone()), &mut changed);
        }
    }
    Outcome::changed(finish(changed))
}

#[cfg(test)]
mod tests {
    use crate::editing::Cmd;
    use crate::fixture;
    use crate::model::ListKind;
    use pretty_assertions::assert_eq;

    fn toggled(lines: &[&str], kind: ListKind) -> Vec<String> {
        let mut doc = fixture::parse(lines).unwrap();
        doc.apply(Cmd::ToggleList { kind });
        fixture::stringify(&doc)
    }

    #[test]
    fn paragraph_becomes_item() {
        assert_eq!(toggled(&["[]text"], ListKind::Bulleted), vec!["* text {id:a00}"]);
    }

    #[test]
    fn kind_change_covers_whole_item() {
        assert_eq!(
            toggled(&["* a", "  a[]2", "* b"], ListKind::Numbered),
            vec!["# a {id:000}", "  a2", "* b {id:001}"]
        );
    }

    #[test]
    fn same_kind_toggles_out_of_list() {
        assert_eq!(
            toggled(&["* [a", "* b]", "* c"], ListKind::Bulleted),
            vec!["a", "b", "* c {id:002}"]
        );
    }

    #[test]
    fn custom_kind_is_rendered_with_tag() {
        assert_eq!(
            toggled(&["* []a"], ListKind::Custom("todo".into())),
            vec!["* a {id:000} {kind:todo}"]
        );
    }

    #[test]
    fn mixed_selection_converts_plain_blocks() {
        assert_eq!(
            toggled(&["[para", "* a]"], ListKind::Bulleted),
            vec!["* para {id:a00}", "* a {id:000}"]
        );
    }
}
