use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;

/// TableSource trait provides a method to load the data rows of a table.
pub trait TableSource {
    /// Loads all data rows of a table, header excluded.
    ///
    /// # Arguments
    /// * `path` - The location of the table.
    /// * `what` - Human readable table kind, used in error messages.
    ///
    /// # Returns
    /// The rows in file order, or an error if the table is missing,
    /// malformed or has no data rows.
    fn load<T: DeserializeOwned>(&self, path: &Path, what: &'static str) -> Result<Vec<T>>;
}

/// DocumentSink trait provides methods to store generated documents.
pub trait DocumentSink {
    /// Makes sure a directory exists, creating it and its parents if needed.
    fn ensure_dir(&mut self, dir: &Path) -> Result<()>;

    /// Writes a document, replacing any previous content at `path`.
    fn write_document(&mut self, path: &Path, contents: &[u8]) -> Result<()>;
}
