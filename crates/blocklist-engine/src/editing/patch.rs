use crate::model::Selection;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Blocks whose list attributes changed, ascending
    pub changed: Vec<usize>,
    pub new_selection: Selection,
    pub version: u64,
}
