//! Property-based tests for the list invariants.
//!
//! Arbitrary (usually broken) block sequences are normalized, and random
//! command sequences are applied to normalized documents. Afterwards:
//!
//! 1. Normalizing again changes nothing
//! 2. The blocks of every item are contiguous
//! 3. All blocks of an item share indent and kind
//! 4. Indents step up by at most one, and every list region starts at 0
//! 5. A forward sibling walk and the backward walk from its last block
//!    agree

use std::collections::HashSet;

use blocklist_engine::{
    Block, Cmd, Document, Fragment, ListAttributes, ListKind, ListWalker, Position, Selection,
    SequentialIds, WalkOptions, structure,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────

fn attributes_strategy() -> impl Strategy<Value = ListAttributes> {
    (0usize..6, 0usize..6, 0usize..3).prop_map(|(id, indent, kind)| {
        let kind = match kind {
            0 => ListKind::Bulleted,
            1 => ListKind::Numbered,
            _ => ListKind::Custom("todo".into()),
        };
        ListAttributes::new(format!("i{id}"), indent, kind)
    })
}

fn block_strategy() -> impl Strategy<Value = Block> {
    prop_oneof![
        1 => "[a-z]{0,3}".prop_map(Block::paragraph),
        4 => ("[a-z]{0,3}", attributes_strategy())
            .prop_map(|(content, list)| Block::list_item(content, list)),
    ]
}

fn blocks_strategy() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(block_strategy(), 0..24)
}

fn structural_cmd_strategy() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        Just(Cmd::MergeBackward),
        Just(Cmd::MergeForward),
        Just(Cmd::Indent),
        Just(Cmd::Outdent),
        Just(Cmd::ToggleList { kind: ListKind::Numbered }),
        Just(Cmd::ToggleList { kind: ListKind::Bulleted }),
        (0usize..24).prop_map(|block| Cmd::SplitBefore { block }),
        (0usize..24).prop_map(|block| Cmd::SplitAfter { block }),
        (0usize..12, 0usize..4).prop_map(|(block, offset)| Cmd::SplitListItem {
            at: Position::new(block, offset),
        }),
    ]
}

/// Pastes of arbitrary (often broken) fragments and raw edits that bypass
/// the structural commands
fn external_cmd_strategy() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        prop::collection::vec(block_strategy(), 1..5).prop_map(|blocks| Cmd::Paste {
            fragment: Fragment::new(blocks),
        }),
        "[a-z]{1,3}(\n[a-z]{1,3}){0,2}".prop_map(|text| Cmd::Paste {
            fragment: Fragment::from_plain_text(&text),
        }),
        (0usize..24, prop::option::of(attributes_strategy()))
            .prop_map(|(block, attributes)| Cmd::SetAttributes { block, attributes }),
        (0usize..24, block_strategy()).prop_map(|(at, block)| Cmd::InsertBlock { at, block }),
        (0usize..24).prop_map(|at| Cmd::RemoveBlocks { range: at..at + 1 }),
    ]
}

fn cmd_strategy() -> impl Strategy<Value = (Cmd, usize, usize)> {
    let cmd = prop_oneof![
        3 => structural_cmd_strategy(),
        2 => external_cmd_strategy(),
    ];
    // Caret block and a second block for range selections
    (cmd, 0usize..24, 0usize..24)
}

// ── Invariant checks ────────────────────────────────────

fn assert_invariants(blocks: &[Block]) -> Result<(), TestCaseError> {
    let mut closed = HashSet::new();
    let mut previous: Option<&ListAttributes> = None;

    for (index, block) in blocks.iter().enumerate() {
        let Some(list) = &block.list else {
            if let Some(prev) = previous {
                closed.insert(prev.item_id.clone());
            }
            previous = None;
            continue;
        };

        match previous {
            None => prop_assert_eq!(list.indent, 0, "region must start at 0 (block {})", index),
            Some(prev) => {
                prop_assert!(list.indent <= prev.indent + 1, "indent jump at block {}", index);
                if prev.item_id == list.item_id {
                    prop_assert_eq!(prev.indent, list.indent, "indent differs in run at {}", index);
                    prop_assert_eq!(&prev.kind, &list.kind, "kind differs in run at {}", index);
                } else {
                    closed.insert(prev.item_id.clone());
                }
            }
        }
        prop_assert!(!closed.contains(&list.item_id), "id reappears at block {}", index);
        previous = Some(list);
    }
    Ok(())
}

fn normalized(mut blocks: Vec<Block>) -> Vec<Block> {
    structure::normalize(&mut blocks, &mut SequentialIds::new("n"));
    blocks
}

proptest! {
    #[test]
    fn normalize_is_idempotent(blocks in blocks_strategy()) {
        let once = normalized(blocks);
        let mut twice = once.clone();

        let changed = structure::normalize(&mut twice, &mut SequentialIds::new("m"));

        prop_assert!(changed.is_empty());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_restores_invariants(blocks in blocks_strategy()) {
        assert_invariants(&normalized(blocks))?;
    }

    #[test]
    fn normalize_keeps_content(blocks in blocks_strategy()) {
        let contents: Vec<String> = blocks.iter().map(|block| block.content.clone()).collect();
        let after: Vec<String> =
            normalized(blocks).into_iter().map(|block| block.content).collect();

        prop_assert_eq!(contents, after);
    }

    #[test]
    fn walker_is_symmetric(blocks in blocks_strategy(), start in 0usize..24) {
        let blocks = normalized(blocks);
        prop_assume!(start < blocks.len());

        let forward: Vec<usize> =
            ListWalker::new(blocks.as_slice(), start, WalkOptions::forward().same_indent())
                .collect();
        let Some(&last) = forward.last() else {
            return Ok(());
        };
        let backward: HashSet<usize> =
            ListWalker::new(blocks.as_slice(), last, WalkOptions::backward().same_indent())
                .collect();

        prop_assert!(backward.contains(&start));
        for index in &forward[..forward.len() - 1] {
            prop_assert!(backward.contains(index), "block {} missing on the way back", index);
        }
    }

    #[test]
    fn commands_preserve_invariants(
        blocks in blocks_strategy(),
        commands in prop::collection::vec(cmd_strategy(), 1..12),
    ) {
        let mut doc =
            Document::new(normalized(blocks)).with_id_generator(SequentialIds::new("c"));

        for (cmd, anchor, focus) in commands {
            let last = doc.blocks().len() - 1;
            let anchor = Position::new(anchor.min(last), 0);
            let focus_block = focus.min(last);
            let focus = Position::new(focus_block, doc.blocks()[focus_block].len());
            doc.set_selection(Selection::range(anchor, focus)).unwrap();

            doc.apply(cmd);

            assert_invariants(doc.blocks())?;
        }
    }

    #[test]
    fn undo_restores_every_earlier_state(
        blocks in blocks_strategy(),
        commands in prop::collection::vec(cmd_strategy(), 1..8),
    ) {
        let mut doc =
            Document::new(normalized(blocks)).with_id_generator(SequentialIds::new("c"));
        let mut states = Vec::new();

        for (cmd, caret, _) in commands {
            let caret = caret.min(doc.blocks().len() - 1);
            doc.set_selection(Selection::caret(Position::new(caret, 0))).unwrap();
            let before = doc.blocks().to_vec();
            doc.apply(cmd);
            if doc.blocks() != before.as_slice() {
                states.push(before);
            }
        }

        while let Some(expected) = states.pop() {
            prop_assert!(doc.undo().is_some());
            prop_assert_eq!(doc.blocks(), expected.as_slice());
        }
        prop_assert!(!doc.can_undo());
    }
}
