use std::fmt;

/// Identity shared by every block of one logical list item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Marker type of a list item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bulleted,
    Numbered,
    /// Host-defined marker, e.g. `todo` for checklists
    Custom(String),
}

impl ListKind {
    /// Marker character used by the line notation
    pub fn marker(&self) -> char {
        match self {
            ListKind::Bulleted | ListKind::Custom(_) => '*',
            ListKind::Numbered => '#',
        }
    }

    pub fn custom_tag(&self) -> Option<&str> {
        match self {
            ListKind::Custom(tag) => Some(tag),
            ListKind::Bulleted | ListKind::Numbered => None,
        }
    }
}

/// List membership of a block.
///
/// The three attributes always travel together: a block is either fully part
/// of a list or not part of one at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAttributes {
    pub item_id: ItemId,
    pub indent: usize,
    pub kind: ListKind,
}

impl ListAttributes {
    pub fn new(item_id: impl Into<ItemId>, indent: usize, kind: ListKind) -> Self {
        Self {
            item_id: item_id.into(),
            indent,
            kind,
        }
    }

    pub fn with_item_id(&self, item_id: ItemId) -> Self {
        Self {
            item_id,
            ..self.clone()
        }
    }

    pub fn with_indent(&self, indent: usize) -> Self {
        Self {
            indent,
            ..self.clone()
        }
    }

    /// Indent and kind match, ignoring identity
    pub fn same_shape(&self, other: &ListAttributes) -> bool {
        self.indent == other.indent && self.kind == other.kind
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ItemId> for ItemId {
    fn from(id: &ItemId) -> Self {
        id.clone()
    }
}
