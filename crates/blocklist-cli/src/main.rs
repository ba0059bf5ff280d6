use anyhow::{Context, Result};
use blocklist_config::{Config, IdStyle};
use blocklist_engine::{
    Cmd, Document, ListKind, Position, Selection, SequentialIds, UuidIds, fixture, io, queries,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

struct App {
    /// Where Ctrl-S writes to
    save_path: PathBuf,
    doc: Document,
    indent_width: usize,
    status: String,
    dirty: bool,
}

impl App {
    fn open(path: &Path, config: &Config) -> Result<Self> {
        let imported = path.extension().is_some_and(|ext| ext == "md");
        let opened = if imported {
            io::import_markdown(path)
        } else if path.exists() {
            io::read_outline(path)
        } else {
            Ok(Document::new(Vec::new()))
        };
        let doc = opened.with_context(|| format!("Failed to open {}", path.display()))?;

        let doc = match &config.ids {
            IdStyle::Uuid => doc.with_id_generator(UuidIds),
            IdStyle::Sequential { prefix } => {
                doc.with_id_generator(SequentialIds::new(prefix.clone()))
            }
        };

        let save_path = if imported {
            path.with_extension("outline")
        } else {
            path.to_path_buf()
        };

        Ok(Self {
            status: format!("Editing {}", save_path.display()),
            save_path,
            doc,
            indent_width: config.indent_width,
            dirty: false,
        })
    }

    fn caret(&self) -> Position {
        self.doc.selection().focus
    }

    fn apply(&mut self, cmd: Cmd) {
        let before = self.doc.version();
        let patch = self.doc.apply(cmd);
        if patch.version != before {
            self.dirty = true;
        }
    }

    fn select(&mut self, selection: Selection) {
        if let Err(e) = self.doc.set_selection(selection) {
            log::warn!("Ignoring caret move: {e}");
        }
    }

    fn move_caret(&mut self, to: Position, extend: bool) {
        let anchor = if extend {
            self.doc.selection().anchor
        } else {
            to
        };
        self.select(Selection::range(anchor, to));
    }

    fn block_len(&self, index: usize) -> usize {
        self.doc.block(index).map_or(0, |block| block.len())
    }

    fn left(&mut self, extend: bool) {
        let at = self.caret();
        let to = if at.offset > 0 {
            Position::new(at.block, at.offset - 1)
        } else if at.block > 0 {
            Position::new(at.block - 1, self.block_len(at.block - 1))
        } else {
            at
        };
        self.move_caret(to, extend);
    }

    fn right(&mut self, extend: bool) {
        let at = self.caret();
        let last = self.doc.blocks().len() - 1;
        let to = if at.offset < self.block_len(at.block) {
            Position::new(at.block, at.offset + 1)
        } else if at.block < last {
            Position::new(at.block + 1, 0)
        } else {
            at
        };
        self.move_caret(to, extend);
    }

    fn vertical(&mut self, down: bool, extend: bool) {
        let at = self.caret();
        let last = self.doc.blocks().len() - 1;
        let block = if down {
            (at.block + 1).min(last)
        } else {
            at.block.saturating_sub(1)
        };
        let to = Position::new(block, at.offset.min(self.block_len(block)));
        self.move_caret(to, extend);
    }

    fn insert_char(&mut self, ch: char) {
        let at = self.doc.selection().start();
        if !self.doc.selection().is_collapsed() {
            self.apply(Cmd::DeleteContent {
                start: at,
                end: self.doc.selection().end(),
            });
        }
        self.apply(Cmd::InsertText {
            at,
            text: ch.to_string(),
        });
    }

    /// Backspace merges across item boundaries, otherwise deletes a character
    fn backspace(&mut self) {
        if self.doc.is_enabled(&Cmd::MergeBackward) {
            self.apply(Cmd::MergeBackward);
            return;
        }
        let selection = self.doc.selection();
        let at = selection.start();
        let start = if !selection.is_collapsed() {
            at
        } else if at.offset > 0 {
            Position::new(at.block, at.offset - 1)
        } else if at.block > 0 {
            Position::new(at.block - 1, self.block_len(at.block - 1))
        } else {
            return;
        };
        self.apply(Cmd::DeleteContent {
            start,
            end: selection.end(),
        });
    }

    fn delete(&mut self) {
        if self.doc.is_enabled(&Cmd::MergeForward) {
            self.apply(Cmd::MergeForward);
            return;
        }
        let selection = self.doc.selection();
        let at = selection.end();
        let end = if !selection.is_collapsed() {
            at
        } else if at.offset < self.block_len(at.block) {
            Position::new(at.block, at.offset + 1)
        } else if at.block + 1 < self.doc.blocks().len() {
            Position::new(at.block + 1, 0)
        } else {
            return;
        };
        self.apply(Cmd::DeleteContent {
            start: selection.start(),
            end,
        });
    }

    fn undo(&mut self) {
        match self.doc.undo() {
            Some(_) => self.dirty = true,
            None => self.status = "Nothing to undo".to_string(),
        }
    }

    fn redo(&mut self) {
        match self.doc.redo() {
            Some(_) => self.dirty = true,
            None => self.status = "Nothing to redo".to_string(),
        }
    }

    fn save(&mut self) {
        match io::write_outline(&self.save_path, &self.doc) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("Saved {}", self.save_path.display());
                log::info!("Saved {}", self.save_path.display());
            }
            Err(e) => {
                self.status = format!("Save failed: {e}");
                log::error!("Failed to save {}: {e}", self.save_path.display());
            }
        }
    }

    /// Returns false when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('q') if ctrl => return false,
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('z') if ctrl => self.undo(),
            KeyCode::Char('y') if ctrl => self.redo(),
            KeyCode::Char('b') if ctrl => self.apply(Cmd::ToggleList {
                kind: ListKind::Bulleted,
            }),
            KeyCode::Char('n') if ctrl => self.apply(Cmd::ToggleList {
                kind: ListKind::Numbered,
            }),
            KeyCode::Char('t') if ctrl => self.apply(Cmd::ToggleList {
                kind: ListKind::Custom("todo".to_string()),
            }),
            KeyCode::Char(ch) if !ctrl => self.insert_char(ch),
            KeyCode::Enter => {
                let at = self.caret();
                self.apply(Cmd::SplitListItem { at });
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Tab => self.apply(Cmd::Indent),
            KeyCode::BackTab => self.apply(Cmd::Outdent),
            KeyCode::Left => self.left(shift),
            KeyCode::Right => self.right(shift),
            KeyCode::Up => self.vertical(false, shift),
            KeyCode::Down => self.vertical(true, shift),
            KeyCode::Home => self.move_caret(Position::new(self.caret().block, 0), shift),
            KeyCode::End => {
                let block = self.caret().block;
                self.move_caret(Position::new(block, self.block_len(block)), shift);
            }
            _ => {}
        }
        true
    }

    /// Text drawn before a block's content: indentation plus the item marker,
    /// or blank space of the same width under the first block of an item
    fn prefix(&self, index: usize) -> String {
        let blocks = self.doc.blocks();
        let Some(list) = &blocks[index].list else {
            return String::new();
        };
        let indent = " ".repeat(list.indent * self.indent_width);
        let marker = match &list.kind {
            ListKind::Bulleted => "•".to_string(),
            ListKind::Numbered => format!("{}.", queries::ordinal(blocks, index)),
            ListKind::Custom(tag) if tag == "todo" => "[ ]".to_string(),
            ListKind::Custom(tag) if tag == "done" => "[x]".to_string(),
            ListKind::Custom(tag) => format!("[{tag}]"),
        };
        if queries::is_first_block_of_item(blocks, index) {
            format!("{indent}{marker} ")
        } else {
            format!("{indent}{} ", " ".repeat(marker.chars().count()))
        }
    }
}

fn id_generator_note(config: &Config) -> &'static str {
    match config.ids {
        IdStyle::Uuid => "uuid",
        IdStyle::Sequential { .. } => "sequential",
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    // First run writes a default config for the user to edit
    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e:#}");
            process::exit(1);
        }
    };

    // --normalize prints the repaired outline and exits
    if args.len() == 3 && args[1] == "--normalize" {
        let doc = io::read_outline(Path::new(&args[2]))?;
        for line in fixture::stringify(&doc) {
            println!("{line}");
        }
        return Ok(());
    }

    let path = match (args.len(), &config.default_outline) {
        (2, _) => PathBuf::from(&args[1]),
        (1, Some(default)) => default.clone(),
        (1, None) => {
            eprintln!("Error: No outline provided and no default_outline configured");
            eprintln!("Usage: {} <outline-file>", args[0]);
            eprintln!("Or set default_outline in {}", Config::config_path().display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [outline-file] | --normalize <outline-file>", args[0]);
            process::exit(1);
        }
    };

    let mut app = App::open(&path, &config)?;
    log::info!(
        "Opened {} ({} blocks, {} ids)",
        path.display(),
        app.doc.blocks().len(),
        id_generator_note(&config)
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.dirty {
        eprintln!("Unsaved changes to {} were discarded", app.save_path.display());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let selection = app.doc.selection();
    let selected = selection.blocks();
    let lines: Vec<Line> = app
        .doc
        .blocks()
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let style = if !selection.is_collapsed() && selected.contains(&index) {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(app.prefix(index), Style::default().fg(Color::Cyan)),
                Span::styled(block.content.clone(), style),
            ])
        })
        .collect();

    let title = if app.dirty {
        format!("{} [modified]", app.save_path.display())
    } else {
        app.save_path.display().to_string()
    };
    let outline = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(outline, chunks[0]);

    // Caret, inside the border
    let caret = selection.focus;
    let x = app.prefix(caret.block).chars().count() + caret.offset + 1;
    let y = caret.block + 1;
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y))
        && y < chunks[0].height.saturating_sub(1)
    {
        f.set_cursor_position((chunks[0].x + x, chunks[0].y + y));
    }

    let help = Line::from(vec![
        Span::raw("Tab/S-Tab: Indent/Outdent | "),
        Span::raw("C-b/C-n/C-t: Bullet/Number/Todo | "),
        Span::raw("C-z/C-y: Undo/Redo | "),
        Span::raw("C-s: Save | Esc: Quit"),
    ]);
    let footer = Paragraph::new(vec![Line::from(app.status.clone()), help]);
    f.render_widget(footer, chunks[1]);
}
