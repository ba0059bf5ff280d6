/*!
 * # Editing core
 *
 * The reference host for the list engine: an in-memory block sequence with
 * a selection, a version counter and undo history.
 *
 * ## Edit pipeline
 *
 * Every change, whether a structural command or a raw edit standing in for
 * something the engine does not control (paste from elsewhere, attribute
 * writes, undo), goes through the same steps inside [`Document::apply`]:
 *
 * 1. **Enabled check**: a command whose `is_enabled` is false is ignored
 *    and returns an empty patch
 * 2. **Execute**: the command edits blocks and list attributes
 * 3. **Normalize**: the post-fixer restores the list invariants
 * 4. **Record**: the previous state goes onto the undo stack
 * 5. **Patch**: the changed blocks, the new selection and the new version
 *    are returned to the caller
 *
 * Nothing outside the document ever sees the state between steps 2 and 3.
 *
 * ## Usage
 *
 * ```rust
 * use blocklist_engine::{Block, Cmd, Document, ListAttributes, ListKind, Position, Selection};
 *
 * let mut doc = Document::new(vec![
 *     Block::list_item("A", ListAttributes::new("a", 0, ListKind::Bulleted)),
 *     Block::list_item("B", ListAttributes::new("b", 0, ListKind::Bulleted)),
 * ]);
 * doc.set_selection(Selection::caret(Position::new(1, 0))).unwrap();
 *
 * let patch = doc.apply(Cmd::Indent);
 * assert_eq!(patch.changed, vec![1]);
 * assert_eq!(doc.blocks()[1].list.as_ref().unwrap().indent, 1);
 *
 * doc.undo();
 * assert_eq!(doc.blocks()[1].list.as_ref().unwrap().indent, 0);
 * ```
 */

pub mod commands;
pub mod document;
mod history;
pub mod patch;

pub use commands::Cmd;
pub use document::{Document, DocumentError};
pub use patch::Patch;
