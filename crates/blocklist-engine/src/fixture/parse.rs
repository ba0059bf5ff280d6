use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::editing::Document;
use crate::fixture::{FixtureError, FixtureOptions, ends_escaped};
use crate::ids::SequentialIds;
use crate::model::{Block, ItemId, ListAttributes, ListKind, Position, Selection};

/// Parse fixture lines, rejecting indent jumps and reused ids
pub fn parse(lines: &[&str]) -> Result<Document, FixtureError> {
    parse_with(lines, FixtureOptions::default())
}

pub fn parse_with(lines: &[&str], options: FixtureOptions) -> Result<Document, FixtureError> {
    let mut parser = FixtureParser::new(options);
    for (index, line) in lines.iter().enumerate() {
        parser.line(index + 1, line)?;
    }
    parser.finish(lines.len())
}

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"^\{(id|kind):([^}]*)\}").expect("Invalid fixture token regex")
    })
}

/// `{id:..}` and `{kind:..}` tokens found on one line
#[derive(Default)]
struct Tokens {
    id: Option<String>,
    kind: Option<String>,
}

impl Tokens {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.kind.is_none()
    }
}

/// Split the tokens off a line. Escape sequences are passed through
/// untouched, so an escaped `{` never starts a token.
fn strip_tokens(line: &str) -> (String, Tokens) {
    let mut tokens = Tokens::default();
    let mut text = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        if ch == '\\' {
            let escape: String = rest.chars().take(2).collect();
            text.push_str(&escape);
            rest = &rest[escape.len()..];
            continue;
        }
        if let Some(captures) = token_regex().captures(rest) {
            let value = captures[2].trim().to_string();
            match &captures[1] {
                "id" => tokens.id = Some(value),
                _ => tokens.kind = Some(value),
            }
            // The space in front of a token separates it from the content
            while text.ends_with(' ') && !ends_escaped(&text[..text.len() - 1]) {
                text.pop();
            }
            rest = &rest[captures[0].len()..];
            continue;
        }
        text.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    (text, tokens)
}

struct FixtureParser {
    options: FixtureOptions,
    blocks: Vec<Block>,
    /// Last item opened at each indent of the current list region
    open: Vec<Option<ListAttributes>>,
    used_ids: HashSet<ItemId>,
    next_auto_id: usize,
    anchor: Option<Position>,
    focus: Option<Position>,
}

impl FixtureParser {
    fn new(options: FixtureOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            open: Vec::new(),
            used_ids: HashSet::new(),
            next_auto_id: 0,
            anchor: None,
            focus: None,
        }
    }

    fn line(&mut self, number: usize, raw: &str) -> Result<(), FixtureError> {
        let (text, tokens) = strip_tokens(raw);
        let rest = text.trim_start_matches(' ');
        let lead = text.len() - rest.len();
        if lead % 2 != 0 {
            return Err(FixtureError::Malformed {
                line: number,
                message: format!("indentation of {lead} spaces is not a multiple of two"),
            });
        }

        let marker = match rest.chars().next() {
            Some('*') if rest == "*" || rest.starts_with("* ") => Some(ListKind::Bulleted),
            Some('#') if rest == "#" || rest.starts_with("# ") => Some(ListKind::Numbered),
            _ => None,
        };

        match marker {
            Some(kind) => {
                let content = rest.get(2..).unwrap_or_default();
                self.item_line(number, lead / 2, kind, content, tokens)
            }
            None if lead == 0 => self.plain_line(number, rest, tokens),
            None => self.continuation_line(number, lead / 2 - 1, rest, tokens),
        }
    }

    fn item_line(
        &mut self,
        number: usize,
        indent: usize,
        kind: ListKind,
        content: &str,
        tokens: Tokens,
    ) -> Result<(), FixtureError> {
        let max = self
            .blocks
            .last()
            .and_then(|block| block.list.as_ref())
            .map_or(0, |previous| previous.indent + 1);
        if indent > max && !self.options.allow_indent_jumps {
            return Err(FixtureError::InvalidIndent {
                line: number,
                indent,
                max,
            });
        }

        let kind = tokens.kind.map_or(kind, ListKind::Custom);
        let item_id = self.item_id(number, tokens.id)?;
        let attributes = ListAttributes::new(item_id, indent, kind);

        self.open.resize(indent + 1, None);
        self.open[indent] = Some(attributes.clone());

        let content = self.take_content(number, content)?;
        self.blocks.push(Block::list_item(content, attributes));
        Ok(())
    }

    fn continuation_line(
        &mut self,
        number: usize,
        indent: usize,
        content: &str,
        tokens: Tokens,
    ) -> Result<(), FixtureError> {
        if !tokens.is_empty() {
            return Err(FixtureError::Malformed {
                line: number,
                message: "id and kind tokens belong on the item line".to_string(),
            });
        }
        let Some(attributes) = self.open.get(indent).cloned().flatten() else {
            return Err(FixtureError::OrphanContinuation {
                line: number,
                indent,
            });
        };

        let contiguous = self
            .blocks
            .last()
            .and_then(|block| block.list.as_ref())
            .is_some_and(|previous| previous.item_id == attributes.item_id);
        if !contiguous && !self.options.ignore_id_conflicts {
            return Err(FixtureError::IdConflict {
                line: number,
                id: attributes.item_id.to_string(),
            });
        }

        self.open.truncate(indent + 1);
        let content = self.take_content(number, content)?;
        self.blocks.push(Block::list_item(content, attributes));
        Ok(())
    }

    fn plain_line(
        &mut self,
        number: usize,
        content: &str,
        tokens: Tokens,
    ) -> Result<(), FixtureError> {
        if !tokens.is_empty() {
            return Err(FixtureError::Malformed {
                line: number,
                message: "plain blocks cannot carry id or kind tokens".to_string(),
            });
        }
        self.open.clear();
        let content = self.take_content(number, content)?;
        self.blocks.push(Block::paragraph(content));
        Ok(())
    }

    /// Every item line consumes one auto id, pinned or not
    fn item_id(&mut self, number: usize, pinned: Option<String>) -> Result<ItemId, FixtureError> {
        let id = match pinned {
            Some(pinned) => {
                self.next_auto_id += 1;
                let id = ItemId::new(pinned);
                if self.used_ids.contains(&id) && !self.options.ignore_id_conflicts {
                    return Err(FixtureError::IdConflict {
                        line: number,
                        id: id.to_string(),
                    });
                }
                id
            }
            None => loop {
                let id = ItemId::new(format!("{:03}", self.next_auto_id));
                self.next_auto_id += 1;
                if !self.used_ids.contains(&id) {
                    break id;
                }
            },
        };
        self.used_ids.insert(id.clone());
        Ok(id)
    }

    /// Resolve escapes and remove `[]`, `[` and `]` from the content,
    /// recording where they were
    fn take_content(&mut self, number: usize, content: &str) -> Result<String, FixtureError> {
        let markers = !self.options.literal_brackets;
        let block = self.blocks.len();
        let mut cleaned = String::with_capacity(content.len());
        let mut offset = 0;
        let mut chars = content.chars().peekable();

        while let Some(ch) = chars.next() {
            let at = Position::new(block, offset);
            match ch {
                '\\' => {
                    let escaped = match chars.next() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some(other) => other,
                        None => return Err(malformed(number, "line ends in a lone `\\`")),
                    };
                    cleaned.push(escaped);
                    offset += 1;
                }
                '[' if markers && chars.peek() == Some(&']') => {
                    chars.next();
                    if self.anchor.is_some() || self.focus.is_some() {
                        return Err(malformed(number, "more than one selection"));
                    }
                    self.anchor = Some(at);
                    self.focus = Some(at);
                }
                '[' if markers => {
                    if self.anchor.is_some() {
                        return Err(malformed(number, "more than one selection"));
                    }
                    self.anchor = Some(at);
                }
                ']' if markers => {
                    if self.anchor.is_none() || self.focus.is_some() {
                        return Err(malformed(number, "`]` without a matching `[`"));
                    }
                    self.focus = Some(at);
                }
                _ => {
                    cleaned.push(ch);
                    offset += 1;
                }
            }
        }
        Ok(cleaned)
    }

    fn finish(self, last_line: usize) -> Result<Document, FixtureError> {
        let selection = match (self.anchor, self.focus) {
            (Some(anchor), Some(focus)) => Some(Selection::range(anchor, focus)),
            (None, None) => None,
            _ => return Err(malformed(last_line, "selection is never closed")),
        };

        let mut doc = Document::new(self.blocks).with_id_generator(SequentialIds::default());
        if let Some(selection) = selection {
            doc.set_selection(selection)?;
        }
        Ok(doc)
    }
}

fn malformed(line: usize, message: &str) -> FixtureError {
    FixtureError::Malformed {
        line,
        message: message.to_string(),
    }
}
