//! Clipboard fragments: a short run of blocks waiting to be pasted.
//!
//! Fragment list attributes are relative to the fragment itself (its top
//! level list is indent 0) and its ids only group blocks into items; paste
//! replaces them.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::model::{Block, ItemId, ListAttributes, ListKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
}

impl Fragment {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// One plain block per line
    pub fn from_plain_text(text: &str) -> Self {
        Self::new(text.lines().map(Block::paragraph).collect())
    }

    /// Convert Markdown into blocks.
    ///
    /// Nested lists become indents, ordered lists become numbered items and
    /// task list items become `todo` (or `done` when checked) items. A loose
    /// item with several paragraphs becomes one item spanning several
    /// blocks. Inline formatting is dropped, only the text is kept.
    ///
    /// ```rust
    /// use blocklist_engine::{Fragment, ListKind};
    ///
    /// let fragment = Fragment::from_markdown("- X\n  1. Y\n");
    /// let y = fragment.blocks[1].list.as_ref().unwrap();
    /// assert_eq!((y.indent, &y.kind), (1, &ListKind::Numbered));
    /// ```
    pub fn from_markdown(markdown: &str) -> Self {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TASKLISTS);
        let mut builder = FragmentBuilder::default();
        for event in parser {
            builder.process_event(event);
        }
        builder.finalize()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// List item currently open in the event stream
struct OpenItem {
    attributes: ListAttributes,
    /// Whether any block has been emitted for this item yet
    emitted: bool,
}

/// Event-driven state for [`Fragment::from_markdown`].
///
/// pulldown-cmark emits nested lists inside their parent item, between the
/// parent's text and its `End(Item)`. Tight items carry bare `Text` events,
/// loose items wrap each paragraph in `Paragraph` events, so text is flushed
/// into a block at every structural boundary either way.
#[derive(Default)]
struct FragmentBuilder {
    blocks: Vec<Block>,
    text: String,
    /// Kind of each open list, innermost last
    lists: Vec<ListKind>,
    items: Vec<OpenItem>,
    next_id: usize,
}

impl FragmentBuilder {
    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::List(first_number)) => {
                self.flush();
                self.lists.push(if first_number.is_some() {
                    ListKind::Numbered
                } else {
                    ListKind::Bulleted
                });
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let indent = self.lists.len().saturating_sub(1);
                let kind = self.lists.last().cloned().unwrap_or(ListKind::Bulleted);
                let item_id = ItemId::new(format!("fragment-{}", self.next_id));
                self.next_id += 1;
                self.items.push(OpenItem {
                    attributes: ListAttributes::new(item_id, indent, kind),
                    emitted: false,
                });
            }
            Event::End(TagEnd::Item) => {
                self.flush();
                if let Some(item) = self.items.pop()
                    && !item.emitted
                {
                    self.blocks
                        .push(Block::list_item(String::new(), item.attributes));
                }
            }
            Event::TaskListMarker(checked) => {
                if let Some(item) = self.items.last_mut() {
                    let tag = if checked { "done" } else { "todo" };
                    item.attributes.kind = ListKind::Custom(tag.to_string());
                }
            }
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_))
            | Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                self.flush();
            }
            Event::Text(text) | Event::Code(text) => self.text.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.text.push(' '),
            _ => {}
        }
    }

    fn flush(&mut self) {
        let content = self.text.trim_end_matches('\n').to_string();
        self.text.clear();
        if content.is_empty() {
            return;
        }

        match self.items.last_mut() {
            Some(item) => {
                item.emitted = true;
                self.blocks
                    .push(Block::list_item(content, item.attributes.clone()));
            }
            None => self.blocks.push(Block::paragraph(content)),
        }
    }

    fn finalize(mut self) -> Fragment {
        self.flush();
        Fragment::new(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(fragment: &Fragment) -> Vec<(String, Option<(usize, ListKind)>)> {
        fragment
            .blocks
            .iter()
            .map(|block| {
                (
                    block.content.clone(),
                    block.list.as_ref().map(|list| (list.indent, list.kind.clone())),
                )
            })
            .collect()
    }

    #[test]
    fn nested_lists_become_indents() {
        let fragment = Fragment::from_markdown("- X\n  - Y\n    - Z\n- W\n");

        assert_eq!(
            shape(&fragment),
            vec![
                ("X".into(), Some((0, ListKind::Bulleted))),
                ("Y".into(), Some((1, ListKind::Bulleted))),
                ("Z".into(), Some((2, ListKind::Bulleted))),
                ("W".into(), Some((0, ListKind::Bulleted))),
            ]
        );
    }

    #[test]
    fn paragraphs_around_lists_stay_plain() {
        let fragment = Fragment::from_markdown("# Title\n\nintro\n\n1. one\n2. two\n\noutro\n");

        assert_eq!(
            shape(&fragment),
            vec![
                ("Title".into(), None),
                ("intro".into(), None),
                ("one".into(), Some((0, ListKind::Numbered))),
                ("two".into(), Some((0, ListKind::Numbered))),
                ("outro".into(), None),
            ]
        );
    }

    #[test]
    fn loose_item_paragraphs_share_an_id() {
        let fragment = Fragment::from_markdown("- first\n\n  second\n- next\n");
        let ids: Vec<_> = fragment
            .blocks
            .iter()
            .map(|block| block.list.as_ref().unwrap().item_id.clone())
            .collect();

        assert_eq!(fragment.len(), 3);
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn task_items_get_custom_kind() {
        let fragment = Fragment::from_markdown("- [ ] open\n- [x] closed\n");

        assert_eq!(
            shape(&fragment),
            vec![
                ("open".into(), Some((0, ListKind::Custom("todo".into())))),
                ("closed".into(), Some((0, ListKind::Custom("done".into())))),
            ]
        );
    }

    #[test]
    fn empty_item_keeps_a_block() {
        let fragment = Fragment::from_markdown("- \n- b\n");

        assert_eq!(fragment.len(), 2);
        assert_eq!(fragment.blocks[0].content, "");
    }

    #[test]
    fn plain_text_is_one_block_per_line() {
        let fragment = Fragment::from_plain_text("a\nb");

        assert_eq!(shape(&fragment), vec![("a".into(), None), ("b".into(), None)]);
    }
}
