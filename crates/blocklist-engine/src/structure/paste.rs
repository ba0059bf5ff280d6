//! Inserting a fragment of blocks at the caret.
//!
//! Pasted content never keeps its own ids: every fragment item gets a fresh
//! one (shared by all blocks of that item), so nothing pasted can collide
//! with or extend an item already in the document. Fragment indents are
//! relative; they are rebased onto the indent of the item at the caret and
//! whatever nesting the fragment brings is left for the normalizer to clamp.

use std::collections::HashMap;

use crate::fragment::Fragment;
use crate::ids::{IdGenerator, mint_unused};
use crate::model::{Block, ItemId, ListAttributes, Position, Selection};
use crate::sequence::{BlockSequence, BlockSequenceMut};
use crate::structure::split::split_before;
use crate::structure::{Outcome, finish};

pub fn paste<S: BlockSequenceMut + ?Sized>(
    seq: &mut S,
    at: Position,
    fragment: &Fragment,
    ids: &mut dyn IdGenerator,
) -> Outcome {
    if fragment.is_empty() || at.block >= seq.len() {
        return Outcome::default();
    }

    let base = seq.attributes(at.block).cloned();
    let mut changed = Vec::new();
    let content_len = seq.content_len(at.block);

    let insert_at = if content_len == 0 {
        // An empty caret block is replaced by the fragment
        seq.remove_blocks(at.block..at.block + 1);
        at.block
    } else if at.offset == 0 {
        at.block
    } else if at.offset >= content_len {
        at.block + 1
    } else {
        seq.split_block(at);
        changed.extend(split_before(seq, at.block + 1, ids));
        at.block + 1
    };

    let rebased = rebase(&*seq, fragment, base.as_ref(), ids);
    let count = rebased.len();

    // Blocks at or after the insertion point move down
    for index in &mut changed {
        if *index >= insert_at {
            *index += count;
        }
    }
    for (offset, block) in rebased.into_iter().enumerate() {
        if block.list.is_some() {
            changed.push(insert_at + offset);
        }
        seq.insert_block(insert_at + offset, block);
    }

    let last = insert_at + count - 1;
    log::debug!("paste: {count} block(s) inserted at {insert_at}");
    Outcome::changed(finish(changed))
        .with_selection(Selection::caret(Position::new(last, seq.content_len(last))))
}

/// Fresh ids and caret-relative indents for every fragment block
fn rebase<S: BlockSequence + ?Sized>(
    seq: &S,
    fragment: &Fragment,
    base: Option<&ListAttributes>,
    ids: &mut dyn IdGenerator,
) -> Vec<Block> {
    let base_indent = base.map_or(0, |attrs| attrs.indent);
    let mut fresh: HashMap<ItemId, ItemId> = HashMap::new();

    fragment
        .blocks
        .iter()
        .map(|block| {
            let list = match (&block.list, base) {
                (Some(attrs), _) => {
                    let id = match fresh.get(&attrs.item_id) {
                        Some(id) => id.clone(),
                        None => {
                            let id = mint_unused(seq, ids);
                            fresh.insert(attrs.item_id.clone(), id.clone());
                            id
                        }
                    };
                    Some(ListAttributes::new(
                        id,
                        attrs.indent + base_indent,
                        attrs.kind.clone(),
                    ))
                }
                // Plain text pasted into a list becomes items of the caret's kind
                (None, Some(base)) => Some(ListAttributes::new(
                    mint_unused(seq, ids),
                    base.indent,
                    base.kind.clone(),
                )),
                (None, None) => None,
            };
            Block {
                content: block.content.clone(),
                list,
            }
        })
        .collect()
}
