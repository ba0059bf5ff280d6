use blocklist_engine::{Block, ListAttributes, ListKind};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_outline(size: usize) -> Vec<Block> {
    (0..size)
        .map(|i| {
            if i % 50 == 49 {
                return Block::paragraph(format!("Paragraph {i}"));
            }
            let kind = if i % 3 == 0 {
                ListKind::Numbered
            } else {
                ListKind::Bulleted
            };
            Block::list_item(
                format!("Item {i}"),
                ListAttributes::new(format!("id{i}"), i % 50 % 4, kind),
            )
        })
        .collect()
}

/// An outline with indent jumps and interleaved item ids, so every pass of
/// the normalizer has work to do
#[allow(dead_code)]
pub fn generate_damaged_outline(size: usize) -> Vec<Block> {
    (0..size)
        .map(|i| {
            let id = format!("id{}", i / 2 % 7 + i / 14 * 7);
            Block::list_item(
                format!("Item {i}"),
                ListAttributes::new(id, i * 7 % 6, ListKind::Bulleted),
            )
        })
        .collect()
}
