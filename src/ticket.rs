//! Ticket identity and path resolution

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, TicketError};

/// Opaque, non-empty name of a ticket. Also the name of its directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(String);

impl TicketId {
    /// Validate a single id
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(TicketError::MissingIdentifier);
        }
        if id.starts_with('.') || id.contains(['/', '\\']) {
            return Err(TicketError::InvalidIdentifier(id));
        }
        Ok(Self(id))
    }

    /// Pick the ticket id from the command line or the fallback (`TCK_ID`).
    ///
    /// An explicit argument only wins when exactly one was given; zero or
    /// several explicit arguments defer to the fallback. Empty values count
    /// as absent.
    pub fn resolve(explicit: &[String], fallback: Option<&str>) -> Result<Self> {
        if let [id] = explicit {
            if !id.is_empty() {
                return Self::new(id.as_str());
            }
        }
        match fallback {
            Some(id) if !id.is_empty() => Self::new(id),
            _ => Err(TicketError::MissingIdentifier),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory this ticket would occupy under `root`. No existence check.
    pub fn path_under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
