pub mod attributes;
pub mod block;

pub use attributes::{ItemId, ListAttributes, ListKind};
pub use block::{Block, Position, Selection};
