use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::traits::DocumentSink;

/// Stores documents as plain files, overwriting earlier runs.
#[derive(Debug, Default)]
pub struct FsDocumentSink;

impl FsDocumentSink {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSink for FsDocumentSink {
    fn ensure_dir(&mut self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))
    }

    fn write_document(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)
            .with_context(|| format!("failed to write file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_is_recursive_and_repeatable() -> Result<()> {
        let root = tempdir()?;
        let dir = root.path().join("acme").join("2026-10-14");
        let mut sink = FsDocumentSink::new();
        sink.ensure_dir(&dir)?;
        sink.ensure_dir(&dir)?;
        assert!(dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_write_document_overwrites() -> Result<()> {
        let root = tempdir()?;
        let path = root.path().join("Jane_Doe.html");
        let mut sink = FsDocumentSink::new();
        sink.write_document(&path, b"first version, longer")?;
        sink.write_document(&path, b"second")?;
        assert_eq!(fs::read(&path)?, b"second");
        Ok(())
    }

    #[test]
    fn test_write_into_missing_dir_fails() -> Result<()> {
        let root = tempdir()?;
        let path = root.path().join("missing").join("x.html");
        let res = FsDocumentSink::new().write_document(&path, b"x");
        let err = res.unwrap_err().to_string();
        assert!(err.starts_with("failed to write file"));
        Ok(())
    }
}
