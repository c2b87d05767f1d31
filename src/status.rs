//! Append-only status log shown to the user.
//!
//! Each run collects its status lines in a [`StatusLog`] and appends them to
//! a history file on exit, which `sdvmod log` reads back.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

/// One timestamped status line
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl StatusEntry {
    /// `[HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }

    /// `[YYYY-MM-DD HH:MM:SS] message`, as written to the history file
    fn render_dated(&self) -> String {
        format!("[{}] {}", self.at.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

/// Status messages in the order they were emitted
#[derive(Debug, Default)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its rendered line
    pub fn push(&mut self, message: impl Into<String>) -> String {
        let entry = StatusEntry {
            at: Local::now(),
            message: message.into(),
        };
        info!("{}", entry.message);
        let line = entry.render();
        self.entries.push(entry);
        line
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append this run's entries to the history file, creating it if needed
    pub fn append_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {:?}", path))?;

        for entry in &self.entries {
            writeln!(file, "{}", entry.render_dated())
                .with_context(|| format!("Failed to write {:?}", path))?;
        }
        Ok(())
    }
}

/// Last `count` lines of the history file; a missing file has no lines
pub fn read_history(path: &Path, count: usize) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    Ok(lines[start..].iter().map(|line| line.to_string()).collect())
}
