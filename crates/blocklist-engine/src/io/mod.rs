//! Outline files on disk.
//!
//! Outlines are stored in fixture notation, one block per line, with every
//! item id written out so that ids survive a save and reload. Content that
//! would read as notation is backslash-escaped on write, and unescaped
//! brackets in hand-written files are kept as text. Markdown files can be imported, but not written
//! back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;
use crate::fixture::{self, FixtureError, FixtureOptions};
use crate::fragment::Fragment;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid outline {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: FixtureError,
    },
}

fn outline_options() -> FixtureOptions {
    FixtureOptions {
        literal_brackets: true,
        ..FixtureOptions::permissive()
    }
}

/// Read an outline file. Structure damaged by hand edits (indent jumps,
/// split items) is repaired on load.
pub fn read_outline(path: &Path) -> Result<Document, IoError> {
    let text = read_existing(path)?;
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = fixture::parse_with(&lines, outline_options()).map_err(|source| {
        IoError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let repaired = doc.normalize();
    if !repaired.is_empty() {
        log::info!(
            "Repaired {} blocks while loading {}",
            repaired.len(),
            path.display()
        );
    }
    Ok(doc)
}

/// Write an outline file, creating parent directories as needed
pub fn write_outline(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut text = fixture::stringify(doc).join("\n");
    text.push('\n');
    fs::write(path, text)?;
    log::debug!("Wrote {} blocks to {}", doc.blocks().len(), path.display());
    Ok(())
}

/// Load a Markdown file as a new outline
pub fn import_markdown(path: &Path) -> Result<Document, IoError> {
    let text = read_existing(path)?;
    let mut doc = Document::new(Fragment::from_markdown(&text).blocks);
    doc.normalize();
    Ok(doc)
}

fn read_existing(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}
