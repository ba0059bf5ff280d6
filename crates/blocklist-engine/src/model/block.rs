use std::ops::RangeInclusive;

use crate::model::ListAttributes;

/// One content unit of the reference host document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub content: String,
    pub list: Option<ListAttributes>,
}

impl Block {
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            list: None,
        }
    }

    pub fn list_item(content: impl Into<String>, list: ListAttributes) -> Self {
        Self {
            content: content.into(),
            list: Some(list),
        }
    }

    /// Content length in characters (caret offsets count characters)
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Caret location: block index plus character offset inside the block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn range(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.focus)
    }

    /// Indices of every block touched by the selection
    pub fn blocks(&self) -> RangeInclusive<usize> {
        self.start().block..=self.end().block
    }
}

/// Byte index of the `chars`-th character, clamped to the end of `content`
pub(crate) fn byte_offset(content: &str, chars: usize) -> usize {
    content
        .char_indices()
        .nth(chars)
        .map_or(content.len(), |(index, _)| index)
}
