//! Append-only run log with timestamped, level-tagged lines.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::types::Level;

pub const START_MARKER: &str = "=== log started ===";
pub const END_MARKER: &str = "=== log finished ===";

#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogFile {
    /// Open `path` for appending and write the start marker.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut log = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };
        log.marker(START_MARKER)?;
        log.writer.flush()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One log line per line of `text`, all tagged with `level`.
    pub fn record(&mut self, level: Level, text: &str) -> io::Result<()> {
        let stamp = timestamp();
        for line in text.lines() {
            writeln!(self.writer, "{stamp} [{}] {line}", level.tag())?;
        }
        if text.is_empty() {
            writeln!(self.writer, "{stamp} [{}] ", level.tag())?;
        }
        Ok(())
    }

    /// Write the end marker and flush.
    pub fn close(mut self) -> io::Result<()> {
        self.marker(END_MARKER)?;
        self.writer.flush()
    }

    fn marker(&mut self, marker: &str) -> io::Result<()> {
        writeln!(self.writer, "{} {marker}", timestamp())
    }
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
