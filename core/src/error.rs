use std::io;
use std::path::PathBuf;

/// Failures a store operation can produce.
///
/// Each variant maps to a distinct process exit code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("project path {} does not exist or is not a directory", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("a project named '{0}' is already registered")]
    DuplicateName(String),

    #[error("no project named '{0}' is registered")]
    UnknownName(String),

    #[error("registry file {} is not parseable", .path.display())]
    CorruptRegistry {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot access registry file {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("skill source {} does not exist; run 'init' or 'update' first", .path.display())]
    SourceMissing { path: PathBuf },

    #[error("failed to write skill tree at {}", .path.display())]
    SyncIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("git fetch from {url} failed: {details}")]
    RemoteUnavailable { url: String, details: String },

    #[error("checkout at {} has local changes a pull would overwrite; commit or discard them first", .path.display())]
    DirtyLocalState { path: PathBuf },
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath { .. } => 2,
            Error::DuplicateName(_) => 3,
            Error::UnknownName(_) => 4,
            Error::CorruptRegistry { .. } => 5,
            Error::Persistence { .. } => 6,
            Error::SourceMissing { .. } => 7,
            Error::SyncIo { .. } => 8,
            Error::RemoteUnavailable { .. } => 9,
            Error::DirtyLocalState { .. } => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
