//! Directory layout of a tck home.
//!
//! ```text
//! <home>/
//!   tickets/           open tickets
//!   tickets/.closed/   closed tickets
//!   recipes/           recipe directories
//! ```
//!
//! These names are part of the on-disk format and must not change.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TicketError};

const TICKETS_DIR: &str = "tickets";
const CLOSED_DIR: &str = ".closed";
const RECIPES_DIR: &str = "recipes";

/// Name of the home directory created under `$HOME` when nothing else is configured
pub const DEFAULT_HOME_DIR: &str = ".tck";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    base: PathBuf,
}

impl HomeLayout {
    fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Layout of an existing home. Fails if `base` is not on disk.
    pub fn resolve_existing(base: &Path) -> Result<Self> {
        if !base.exists() {
            return Err(TicketError::NotFound(base.to_path_buf()));
        }
        Ok(Self::new(base))
    }

    /// Layout of a home, creating the base and its subdirectories as needed
    pub fn resolve_or_create(base: &Path) -> Result<Self> {
        let layout = Self::new(base);
        for dir in [layout.closed_path(), layout.recipes_path()] {
            fs::create_dir_all(&dir).map_err(|e| TicketError::io(&dir, e))?;
        }
        Ok(layout)
    }

    /// `$HOME/.tck`, if a home directory can be determined
    pub fn default_base() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_HOME_DIR))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn tickets_path(&self) -> PathBuf {
        self.base.join(TICKETS_DIR)
    }

    pub fn closed_path(&self) -> PathBuf {
        self.tickets_path().join(CLOSED_DIR)
    }

    pub fn recipes_path(&self) -> PathBuf {
        self.base.join(RECIPES_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths_are_fixed_joins() {
        let temp = tempdir().unwrap();
        let layout = HomeLayout::resolve_existing(temp.path()).unwrap();

        assert_eq!(layout.tickets_path(), temp.path().join("tickets"));
        assert_eq!(
            layout.closed_path(),
            temp.path().join("tickets").join(".closed")
        );
        assert_eq!(layout.recipes_path(), temp.path().join("recipes"));
    }

    #[test]
    fn test_resolve_existing_missing_base() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");

        let err = HomeLayout::resolve_existing(&missing).unwrap_err();
        assert!(matches!(err, TicketError::NotFound(p) if p == missing));
        assert!(!missing.exists());
    }

    #[test]
    fn test_resolve_or_create_builds_tree() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("home");

        let layout = HomeLayout::resolve_or_create(&base).unwrap();

        assert!(layout.tickets_path().is_dir());
        assert!(layout.closed_path().is_dir());
        assert!(layout.recipes_path().is_dir());
    }

    #[test]
    fn test_resolve_or_create_is_idempotent() {
        let temp = tempdir().unwrap();
        let first = HomeLayout::resolve_or_create(temp.path()).unwrap();
        fs::write(first.tickets_path().join("keep"), "x").unwrap();

        let second = HomeLayout::resolve_or_create(temp.path()).unwrap();

        assert_eq!(first, second);
        assert!(second.tickets_path().join("keep").exists());
    }

    #[test]
    fn test_resolve_or_create_fails_when_base_is_a_file() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("file");
        fs::write(&base, "not a dir").unwrap();

        let err = HomeLayout::resolve_or_create(&base).unwrap_err();
        assert!(matches!(err, TicketError::Io { .. }));
    }
}
