use crate::editing::Document;
use crate::fixture::ends_escaped;
use crate::model::{Block, Selection, block::byte_offset};

/// Render a document back into fixture lines. Every item line carries its
/// id and content is escaped, so the output parses back into the same
/// blocks.
pub fn stringify(doc: &Document) -> Vec<String> {
    render(doc.blocks(), None)
}

/// Like [`stringify`], with the selection drawn as `[]` or `[`..`]`
pub fn stringify_with_selection(doc: &Document) -> Vec<String> {
    render(doc.blocks(), Some(doc.selection()))
}

pub(crate) fn render(blocks: &[Block], selection: Option<Selection>) -> Vec<String> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let content = with_markers(&block.content, index, selection);
            let Some(list) = &block.list else {
                return content;
            };

            let continues_item = index > 0
                && blocks[index - 1]
                    .list
                    .as_ref()
                    .is_some_and(|previous| previous.item_id == list.item_id);
            if continues_item {
                return format!("{}{content}", "  ".repeat(list.indent + 1));
            }

            let mut line = "  ".repeat(list.indent);
            line.push(list.kind.marker());
            line.push(' ');
            if !content.is_empty() {
                line.push_str(&content);
                line.push(' ');
            }
            line.push_str(&format!("{{id:{}}}", list.item_id));
            if let Some(tag) = list.kind.custom_tag() {
                line.push_str(&format!(" {{kind:{tag}}}"));
            }
            line
        })
        .collect()
}

fn with_markers(content: &str, index: usize, selection: Option<Selection>) -> String {
    let mut markers = Vec::new();
    if let Some(selection) = selection {
        let (start, end) = (selection.start(), selection.end());
        if selection.is_collapsed() {
            if start.block == index {
                markers.push((start.offset, "[]"));
            }
        } else {
            if start.block == index {
                markers.push((start.offset, "["));
            }
            if end.block == index {
                markers.push((end.offset, "]"));
            }
        }
    }

    let mut rendered = String::with_capacity(content.len());
    let mut last = 0;
    for (offset, marker) in markers {
        let at = byte_offset(content, offset).max(last);
        rendered.push_str(&escape(&content[last..at], rendered.is_empty(), false));
        rendered.push_str(marker);
        last = at;
    }
    rendered.push_str(&escape(&content[last..], rendered.is_empty(), true));
    rendered
}

/// Escape characters the parser would read as notation. `leading` and
/// `trailing` say whether the text starts or ends the line's content.
fn escape(text: &str, leading: bool, trailing: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    if leading
        && (text.starts_with(' ')
            || matches!(text, "*" | "#")
            || text.starts_with("* ")
            || text.starts_with("# "))
    {
        escaped.push('\\');
    }

    for ch in text.chars() {
        match ch {
            '\\' | '{' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    // A bare trailing space would be taken for the separator before a token
    if trailing && escaped.ends_with(' ') && !ends_escaped(&escaped[..escaped.len() - 1]) {
        escaped.insert(escaped.len() - 1, '\\');
    }
    escaped
}
