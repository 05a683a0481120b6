use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{errors::GeneratorError, traits::TableSource};

const DELIMITER: u8 = b';';

/// Reads semicolon separated tables from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvTableSource;

impl CsvTableSource {
    pub fn new() -> Self {
        Self
    }
}

impl TableSource for CsvTableSource {
    fn load<T: DeserializeOwned>(&self, path: &Path, what: &'static str) -> Result<Vec<T>> {
        let file = File::open(path)
            .with_context(|| format!("couldn't open {what} database '{}'", path.display()))?;
        let rows = parse_rows(file, path, what)?;
        debug!(table = what, path = %path.display(), rows = rows.len(), "table loaded");
        Ok(rows)
    }
}

/// Parses every data row of `input`. The first row is the header and is
/// discarded; a table without at least one data row is an error.
pub fn parse_rows<R, T>(input: R, path: &Path, what: &'static str) -> Result<Vec<T>>
where
    R: std::io::Read,
    T: DeserializeOwned,
{
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .trim(Trim::None)
        .flexible(false)
        .from_reader(input);

    let mut rows = Vec::new();
    for rec in reader.byte_records() {
        let record = rec.with_context(|| {
            format!("couldn't parse {what} database file '{}'", path.display())
        })?;
        let row: T = record.deserialize(None).with_context(|| {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            format!(
                "couldn't parse {what} database file '{}' at line {line}",
                path.display()
            )
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(GeneratorError::EmptyTable {
            what,
            path: path.to_path_buf(),
        })?;
    }

    Ok(rows)
}
