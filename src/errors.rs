use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("{what} not exists {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{what} database is empty: {}", path.display())]
    EmptyTable { what: &'static str, path: PathBuf },
}
