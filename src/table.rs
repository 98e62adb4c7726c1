//! Header-prefixed, comma-delimited table files.
//!
//! Every table is a header line followed by one record per line. Fields are
//! joined with `,` and never quoted, so a field can not contain a comma or a
//! line break. Blank lines are ignored on read.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock;

/// A row type that can be stored in a [`Table`].
pub trait Record: Sized {
    /// Header line written at the top of the file.
    const HEADER: &'static str;

    /// Decode one row. `fields` is the line split on `,`.
    fn decode(fields: &[&str]) -> std::result::Result<Self, String>;

    /// Encode as a single line without the trailing newline.
    fn encode(&self) -> String;
}

/// Reject values the row format cannot represent.
pub fn ensure_field(label: &str, value: &str) -> Result<()> {
    if value.contains([',', '\n', '\r']) {
        return Err(Error::InvalidArgument(format!(
            "{label} cannot contain commas or line breaks"
        )));
    }
    Ok(())
}

/// Check the column count of a decoded line.
pub fn expect_columns(fields: &[&str], columns: usize) -> std::result::Result<(), String> {
    if fields.len() != columns {
        return Err(format!(
            "expected {columns} columns, found {}",
            fields.len()
        ));
    }
    Ok(())
}

pub fn parse_u32(column: &str, raw: &str) -> std::result::Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("{column}: '{raw}' is not a non-negative integer"))
}

#[derive(Debug, Clone)]
pub struct Table<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Table<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write a header-only file unless one already exists.
    ///
    /// Returns `true` when the file was created.
    pub fn create_if_missing(&self) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.rewrite(&[])?;
        Ok(true)
    }

    /// Read every record in file order.
    pub fn read_all(&self) -> Result<Vec<R>> {
        let mut records = Vec::new();
        self.for_each_row(|record| {
            records.push(record);
            true
        })?;
        tracing::debug!(path = %self.path.display(), rows = records.len(), "table read");
        Ok(records)
    }

    /// Linear scan returning the first record matching `predicate`.
    ///
    /// Stops reading at the first match.
    pub fn find_first<F>(&self, mut predicate: F) -> Result<Option<R>>
    where
        F: FnMut(&R) -> bool,
    {
        let mut found = None;
        self.for_each_row(|record| {
            if predicate(&record) {
                found = Some(record);
                return false;
            }
            true
        })?;
        Ok(found)
    }

    /// Append one record, writing the header first if the file is missing or empty.
    pub fn append(&self, record: &R) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut prefix = String::new();
        let len = file.metadata()?.len();
        if len == 0 {
            prefix.push_str(R::HEADER);
            prefix.push('\n');
        } else {
            file.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                prefix.push('\n');
            }
        }

        let line = record.encode();
        writeln!(file, "{prefix}{line}")?;
        file.sync_all()?;

        tracing::debug!(path = %self.path.display(), row = %line, "row appended");
        Ok(())
    }

    /// Replace the whole file with the header and `records`.
    pub fn rewrite(&self, records: &[R]) -> Result<()> {
        let mut content = String::with_capacity(R::HEADER.len() + 1 + records.len() * 24);
        content.push_str(R::HEADER);
        content.push('\n');
        for record in records {
            content.push_str(&record.encode());
            content.push('\n');
        }

        lock::write_atomic_str(&self.path, &content)?;
        tracing::debug!(path = %self.path.display(), rows = records.len(), "table rewritten");
        Ok(())
    }

    /// Raw file bytes, used to restore the table after a failed multi-table change.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    pub fn restore(&self, snapshot: &[u8]) -> Result<()> {
        lock::write_atomic(&self.path, snapshot)
    }

    fn for_each_row<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(R) -> bool,
    {
        let reader = BufReader::new(File::open(&self.path)?);

        // The first line is the header.
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            let record = R::decode(&fields).map_err(|message| Error::Parse {
                path: self.path.clone(),
                line: idx + 1,
                message,
            })?;

            if !visit(record) {
                break;
            }
        }

        Ok(())
    }
}
