//! The narrow host interface the list engine is written against.
//!
//! Blocks are addressed by index; the engine never holds on to an index
//! across edit batches. Content is opaque apart from its length, which the
//! engine needs to tell whether a caret sits on a block boundary.

use std::ops::Range;

use crate::model::{Block, ItemId, ListAttributes, Position, block::byte_offset};

/// Read access to an ordered block sequence
pub trait BlockSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn attributes(&self, index: usize) -> Option<&ListAttributes>;

    /// Content length of the block in characters
    fn content_len(&self, index: usize) -> usize;

    fn item_id(&self, index: usize) -> Option<&ItemId> {
        self.attributes(index).map(|attrs| &attrs.item_id)
    }

    fn indent(&self, index: usize) -> Option<usize> {
        self.attributes(index).map(|attrs| attrs.indent)
    }

    fn is_list_block(&self, index: usize) -> bool {
        self.attributes(index).is_some()
    }

    fn contains_item_id(&self, id: &ItemId) -> bool {
        (0..self.len()).any(|index| self.item_id(index) == Some(id))
    }
}

/// Attribute writes and the few host edits the engine needs to drive
pub trait BlockSequenceMut: BlockSequence {
    fn set_attributes(&mut self, index: usize, attributes: ListAttributes);

    fn remove_attributes(&mut self, index: usize);

    fn remove_blocks(&mut self, range: Range<usize>);

    /// Insert a block before `index` (or at the end when `index == len`)
    fn insert_block(&mut self, index: usize, block: Block);

    /// Paragraph break: the content after `at` moves into a new block inserted
    /// right after `at.block`, carrying a copy of the block's list attributes.
    fn split_block(&mut self, at: Position);

    /// Delete everything between two positions. Blocks strictly between them
    /// are removed and the remainder of the end block is joined into the start
    /// block, which keeps its own attributes.
    fn delete_content(&mut self, start: Position, end: Position);
}

impl BlockSequence for [Block] {
    fn len(&self) -> usize {
        <[Block]>::len(self)
    }

    fn attributes(&self, index: usize) -> Option<&ListAttributes> {
        self.get(index)?.list.as_ref()
    }

    fn content_len(&self, index: usize) -> usize {
        self.get(index).map_or(0, Block::len)
    }
}

impl BlockSequence for Vec<Block> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn attributes(&self, index: usize) -> Option<&ListAttributes> {
        self.as_slice().attributes(index)
    }

    fn content_len(&self, index: usize) -> usize {
        self.as_slice().content_len(index)
    }
}

impl BlockSequenceMut for Vec<Block> {
    fn set_attributes(&mut self, index: usize, attributes: ListAttributes) {
        if let Some(block) = self.get_mut(index) {
            block.list = Some(attributes);
        }
    }

    fn remove_attributes(&mut self, index: usize) {
        if let Some(block) = self.get_mut(index) {
            block.list = None;
        }
    }

    fn remove_blocks(&mut self, range: Range<usize>) {
        let end = range.end.min(Vec::len(self));
        let start = range.start.min(end);
        self.drain(start..end);
    }

    fn insert_block(&mut self, index: usize, block: Block) {
        let index = index.min(Vec::len(self));
        self.insert(index, block);
    }

    fn split_block(&mut self, at: Position) {
        let Some(block) = self.get_mut(at.block) else {
            return;
        };
        let split_at = byte_offset(&block.content, at.offset);
        let tail = block.content.split_off(split_at);
        let list = block.list.clone();
        self.insert(
            at.block + 1,
            Block {
                content: tail,
                list,
            },
        );
    }

    fn delete_content(&mut self, start: Position, end: Position) {
        let (start, end) = (start.min(end), start.max(end));
        if end.block >= Vec::len(self) {
            return;
        }

        let head = &self[start.block].content;
        let head = head[..byte_offset(head, start.offset)].to_string();
        let tail = &self[end.block].content;
        let tail = &tail[byte_offset(tail, end.offset)..];
        let joined = head + tail;

        if end.block > start.block {
            self.drain(start.block + 1..=end.block);
        }
        self[start.block].content = joined;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListKind;

    fn item(content: &str, id: &str) -> Block {
        Block::list_item(content, ListAttributes::new(id, 0, ListKind::Bulleted))
    }

    #[test]
    fn split_block_copies_attributes_to_tail() {
        let mut blocks = vec![item("héllo", "a")];
        blocks.split_block(Position::new(0, 2));

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].content, "hé");
        assert_eq!(blocks[1].content, "llo");
        assert_eq!(blocks[1].list, blocks[0].list);
    }

    #[test]
    fn delete_content_joins_boundary_blocks() {
        let mut blocks = vec![item("abc", "a"), item("middle", "b"), item("xyz", "c")];
        blocks.delete_content(Position::new(0, 1), Position::new(2, 2));

        assert_eq!(blocks, vec![item("az", "a")]);
    }

    #[test]
    fn delete_content_within_one_block() {
        let mut blocks = vec![Block::paragraph("abcdef")];
        blocks.delete_content(Position::new(0, 4), Position::new(0, 1));

        assert_eq!(blocks[0].content, "aef");
    }

    #[test]
    fn contains_item_id_scans_all_blocks() {
        let blocks = vec![Block::paragraph("x"), item("y", "b")];

        assert!(blocks.contains_item_id(&ItemId::new("b")));
        assert!(!blocks.contains_item_id(&ItemId::new("a")));
    }

    #[test]
    fn slices_answer_the_same_queries_as_vectors() {
        let blocks = vec![item("a", "x"), Block::paragraph("b")];
        let slice: &[Block] = &blocks;

        assert_eq!(slice.indent(0), Some(0));
        assert!(!slice.is_list_block(1));
        assert_eq!(slice.content_len(1), 1);
    }
}
