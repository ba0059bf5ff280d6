/*!
 * # Fixture notation
 *
 * A line-based notation for writing block sequences in tests, one block per
 * line:
 *
 * | line               | block                                            |
 * |--------------------|--------------------------------------------------|
 * | `* foo`            | bulleted item at indent 0                        |
 * | `# foo`            | numbered item                                    |
 * | `  * foo`          | item at indent 1 (two spaces per level)          |
 * | `  more`           | continuation block of the open item at indent 0  |
 * | `foo`              | plain block (ends the list region)               |
 *
 * Suffix tokens: `{id:xyz}` pins an item id, `{kind:todo}` makes the item a
 * custom kind. Items without a pinned id are numbered `000`, `001`, ... in
 * line order. `[]` marks the caret; `[` and `]` mark the two ends of a
 * selection, which may span lines.
 *
 * A backslash makes the next character plain content: `\{`, `\[`, `\]` and
 * `\\` stand for themselves, `\n` is a line break inside the block, and a
 * leading `\* `, `\# ` or `\ ` keeps content from reading as a marker or as
 * indentation. [`stringify`] writes these escapes wherever they are needed, so
 * any block sequence survives a round trip.
 *
 * ```rust
 * use blocklist_engine::{ListKind, fixture};
 *
 * let doc = fixture::parse(&["* a", "  a2", "  # b {id:b}"]).unwrap();
 * let b = doc.blocks()[2].list.as_ref().unwrap();
 * assert_eq!((b.item_id.as_str(), b.indent, &b.kind), ("b", 1, &ListKind::Numbered));
 * assert_eq!(fixture::stringify(&doc), vec!["* a {id:000}", "  a2", "  # b {id:b}"]);
 * ```
 *
 * Documents built from fixtures mint fresh ids with
 * [`SequentialIds`](crate::ids::SequentialIds), so the ids the engine assigns
 * (`a00`, `a01`, ...) can be written into expectations.
 */

mod parse;
mod render;

pub use parse::{parse, parse_with};
pub use render::{stringify, stringify_with_selection};

/// Whether `text` ends in an unpaired backslash, i.e. escapes whatever
/// follows it
pub(crate) fn ends_escaped(text: &str) -> bool {
    text.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}

/// Invalid fixture input. These are authoring mistakes in a test, never
/// runtime conditions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error("line {line}: indent {indent} jumps past the allowed maximum {max}")]
    InvalidIndent {
        line: usize,
        indent: usize,
        max: usize,
    },
    #[error("line {line}: id {id} is already used by another item")]
    IdConflict { line: usize, id: String },
    #[error("line {line}: continuation has no open item at indent {indent}")]
    OrphanContinuation { line: usize, indent: usize },
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error(transparent)]
    Document(#[from] crate::editing::DocumentError),
}

/// Opt-ins for writing deliberately broken sequences, e.g. to test the
/// normalizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureOptions {
    pub allow_indent_jumps: bool,
    pub ignore_id_conflicts: bool,
    /// Keep `[` and `]` as content instead of reading them as selection
    /// markers
    pub literal_brackets: bool,
}

impl FixtureOptions {
    pub fn permissive() -> Self {
        Self {
            allow_indent_jumps: true,
            ignore_id_conflicts: true,
            literal_brackets: false,
        }
    }
}
