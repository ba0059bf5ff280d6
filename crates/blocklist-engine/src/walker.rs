//! # ListWalker
//!
//! Directional, filtered iteration over the list blocks around a start block.
//!
//! Lists are stored flat, so "the previous sibling", "the parent item" or "all
//! nested descendants" are not pointers but questions asked of the block
//! sequence. The walker answers them lazily: it steps away from the start
//! block one block at a time and classifies each block by comparing its
//! indent with the start block's indent (the reference, which never changes
//! during a walk):
//!
//! | indent vs reference | class   | requested          | not requested |
//! |---------------------|---------|--------------------|---------------|
//! | equal               | same    | yield              | stop          |
//! | greater             | higher  | yield              | skip          |
//! | less                | lower   | yield              | stop          |
//!
//! Skipping higher blocks lets a sibling-level walk pass transparently over
//! nested sub-trees. A block without list attributes always ends the walk.
//! When `same_item_id` or `same_item_kind` is set, a yielded block must also
//! match the start block on that attribute or the walk ends.
//!
//! ```rust
//! use blocklist_engine::{ListWalker, WalkOptions, fixture};
//!
//! let doc = fixture::parse(&["* a", "  * a1", "* b", "* c"]).unwrap();
//! let siblings: Vec<usize> =
//!     ListWalker::new(doc.blocks(), 0, WalkOptions::forward().same_indent()).collect();
//! assert_eq!(siblings, vec![2, 3]);
//! ```

use crate::model::ListAttributes;
use crate::sequence::BlockSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Filters for a walk. Build with [`WalkOptions::forward`] or
/// [`WalkOptions::backward`] and chain the toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    pub direction: Direction,
    pub include_self: bool,
    pub same_indent: bool,
    pub higher_indent: bool,
    pub lower_indent: bool,
    pub same_item_id: bool,
    pub same_item_kind: bool,
}

impl WalkOptions {
    pub fn forward() -> Self {
        Self {
            direction: Direction::Forward,
            ..Self::default()
        }
    }

    pub fn backward() -> Self {
        Self {
            direction: Direction::Backward,
            ..Self::default()
        }
    }

    pub fn include_self(mut self) -> Self {
        self.include_self = true;
        self
    }

    pub fn same_indent(mut self) -> Self {
        self.same_indent = true;
        self
    }

    pub fn higher_indent(mut self) -> Self {
        self.higher_indent = true;
        self
    }

    pub fn lower_indent(mut self) -> Self {
        self.lower_indent = true;
        self
    }

    /// Every indent class: the walk only ends at a non-list block
    pub fn any_indent(self) -> Self {
        self.same_indent().higher_indent().lower_indent()
    }

    pub fn same_item_id(mut self) -> Self {
        self.same_item_id = true;
        self
    }

    pub fn same_item_kind(mut self) -> Self {
        self.same_item_kind = true;
        self
    }

    fn any_class_requested(&self) -> bool {
        self.same_indent || self.higher_indent || self.lower_indent
    }
}

/// Lazy iterator over block indices. Finite: every step either moves one
/// block further from the start or ends the walk.
#[derive(Debug)]
pub struct ListWalker<'a, S: BlockSequence + ?Sized> {
    seq: &'a S,
    start: usize,
    options: WalkOptions,
    reference: Option<&'a ListAttributes>,
    cursor: usize,
    pending_self: bool,
    done: bool,
}

impl<'a, S: BlockSequence + ?Sized> ListWalker<'a, S> {
    /// A walk from a block without list attributes, or with no indent class
    /// requested, yields nothing.
    pub fn new(seq: &'a S, start: usize, options: WalkOptions) -> Self {
        let reference = seq.attributes(start);
        Self {
            seq,
            start,
            options,
            reference,
            cursor: start,
            pending_self: options.include_self,
            done: reference.is_none() || !options.any_class_requested(),
        }
    }

    /// First block the walk would yield
    pub fn first(seq: &'a S, start: usize, options: WalkOptions) -> Option<usize> {
        Self::new(seq, start, options).next()
    }

    fn step(&self) -> Option<usize> {
        match self.options.direction {
            Direction::Forward => Some(self.cursor + 1).filter(|next| *next < self.seq.len()),
            Direction::Backward => self.cursor.checked_sub(1),
        }
    }

    fn finish(&mut self) -> Option<usize> {
        self.done = true;
        None
    }
}

impl<S: BlockSequence + ?Sized> Iterator for ListWalker<'_, S> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let reference = self.reference?;

        if self.pending_self {
            self.pending_self = false;
            return Some(self.start);
        }

        loop {
            let Some(index) = self.step() else {
                return self.finish();
            };
            self.cursor = index;

            let Some(attrs) = self.seq.attributes(index) else {
                return self.finish();
            };

            let requested = match attrs.indent.cmp(&reference.indent) {
                std::cmp::Ordering::Equal => self.options.same_indent,
                std::cmp::Ordering::Less => self.options.lower_indent,
                std::cmp::Ordering::Greater => {
                    if !self.options.higher_indent {
                        continue;
                    }
                    true
                }
            };
            if !requested {
                return self.finish();
            }

            if (self.options.same_item_id && attrs.item_id != reference.item_id)
                || (self.options.same_item_kind && attrs.kind != reference.kind)
            {
                return self.finish();
            }

            return Some(index);
        }
    }
}
