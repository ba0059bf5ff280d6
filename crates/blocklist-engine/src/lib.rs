pub mod editing;
pub mod fixture;
pub mod fragment;
pub mod ids;
pub mod io;
pub mod model;
pub mod queries;
pub mod sequence;
pub mod structure;
pub mod walker;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, DocumentError, Patch};
pub use fragment::Fragment;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use model::*;
pub use sequence::{BlockSequence, BlockSequenceMut};
pub use walker::{Direction, ListWalker, WalkOptions};
