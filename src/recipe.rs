//! Recipes: reusable directories of starter files for new tickets.
//!
//! A recipe lives at `<home>/recipes/<name>/` and may carry a
//! `recipe.json` manifest with defaults for tickets created from it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketError};

pub const MANIFEST_FILE: &str = "recipe.json";

/// Selector that requests every eligible file of a recipe
pub const COPY_ALL: &str = "*";

/// Defaults declared by `recipe.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL template with one `@` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Files created empty in every new ticket
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Selectors copied when the caller gives none
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub dir: PathBuf,
    pub manifest: RecipeManifest,
}

impl Recipe {
    /// Load the recipe `name` from the recipes root
    pub fn load(recipes_root: &Path, name: &str) -> Result<Self> {
        let dir = recipes_root.join(name);
        if !dir.is_dir() {
            return Err(TicketError::NotFound(dir));
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let bytes =
                fs::read(&manifest_path).map_err(|e| TicketError::io(&manifest_path, e))?;
            serde_json::from_slice(&bytes).map_err(|source| TicketError::Parse {
                path: Some(manifest_path),
                source,
            })?
        } else {
            RecipeManifest::default()
        };

        Ok(Self {
            name: name.to_string(),
            dir,
            manifest,
        })
    }
}

/// Which recipe files to copy into a new ticket
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CopySelection {
    #[default]
    None,
    All,
    Named(Vec<String>),
}

impl CopySelection {
    /// Interpret a selector list: empty copies nothing, a lone `*` copies everything
    pub fn from_selectors(selectors: &[String]) -> Self {
        match selectors {
            [] => CopySelection::None,
            [only] if only == COPY_ALL => CopySelection::All,
            named => CopySelection::Named(named.to_vec()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CopySelection::None)
    }
}
