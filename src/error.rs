//! Errors raised by the ticket lifecycle core.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors specific to ticket operations
#[derive(Error, Debug)]
pub enum TicketError {
    #[error("no ticket id set: pass one as an argument or export TCK_ID")]
    MissingIdentifier,

    #[error("invalid ticket id '{0}': ids must be a single path component not starting with '.'")]
    InvalidIdentifier(String),

    #[error("invalid file name '{0}': names must stay inside their directory")]
    InvalidFileName(String),

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to parse metadata{}: {source}", display_path(.path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to stage {} file(s): {}", .failed.len(), .failed.join(", "))]
    StagingFailed { failed: Vec<String> },

    #[error("unsupported platform: set TCK_EDITOR to choose how tickets are opened")]
    UnsupportedPlatform,
}

impl TicketError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TicketError::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

pub type Result<T, E = TicketError> = std::result::Result<T, E>;
