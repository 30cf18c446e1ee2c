//! Ticket lifecycle: create, close and reopen.
//!
//! A ticket is open while its directory sits in `tickets/` and closed while
//! it sits in `tickets/.closed/`. Transitions are a single `fs::rename`.
//!
//! The engine assumes a single writer. Two invocations racing on the same
//! ticket id are not detected and can leave the home inconsistent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TicketError};
use crate::events::EventSink;
use crate::home::HomeLayout;
use crate::metadata::{self, Metadata};
use crate::recipe::{CopySelection, Recipe};
use crate::stager::{self, FileStager};
use crate::ticket::TicketId;

const STAGING_PREFIX: &str = ".staging-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    Open,
    Closed,
}

impl TicketState {
    /// Directory holding tickets in this state
    pub fn root(&self, layout: &HomeLayout) -> PathBuf {
        match self {
            TicketState::Open => layout.tickets_path(),
            TicketState::Closed => layout.closed_path(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketState::Open => "open",
            TicketState::Closed => "closed",
        }
    }
}

/// Everything needed to create one ticket
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub id: TicketId,
    pub description: Option<String>,
    /// URL template with one `@` placeholder
    pub url_template: Option<String>,
    /// Recipe name under the recipes root
    pub recipe: Option<String>,
    /// Files created empty
    pub files: Vec<String>,
    /// Recipe files to copy. Ignored without a recipe.
    pub copy: Vec<String>,
}

impl CreateRequest {
    pub fn new(id: TicketId) -> Self {
        Self {
            id,
            description: None,
            url_template: None,
            recipe: None,
            files: Vec::new(),
            copy: Vec::new(),
        }
    }
}

pub struct LifecycleEngine<'a> {
    layout: &'a HomeLayout,
    sink: &'a dyn EventSink,
    default_url_template: Option<String>,
}

impl<'a> LifecycleEngine<'a> {
    pub fn new(layout: &'a HomeLayout, sink: &'a dyn EventSink) -> Self {
        Self {
            layout,
            sink,
            default_url_template: None,
        }
    }

    /// URL template used when neither the request nor the recipe has one
    pub fn with_default_url_template(mut self, template: Option<String>) -> Self {
        self.default_url_template = template;
        self
    }

    /// Which root currently holds the ticket, if any
    pub fn locate(&self, id: &TicketId) -> Option<TicketState> {
        [TicketState::Open, TicketState::Closed]
            .into_iter()
            .find(|state| id.path_under(&state.root(self.layout)).exists())
    }

    /// Create a new open ticket and return its directory.
    ///
    /// The ticket is assembled in a hidden staging directory and renamed
    /// into place only after every file and `meta.json` were written. A
    /// failed create removes the staging directory.
    pub fn create(&self, request: &CreateRequest) -> Result<PathBuf> {
        let id = &request.id;
        let ticket_dir = id.path_under(&self.layout.tickets_path());
        if ticket_dir.exists() {
            return Err(TicketError::AlreadyExists(ticket_dir));
        }
        let closed_dir = id.path_under(&self.layout.closed_path());
        if closed_dir.exists() {
            return Err(TicketError::AlreadyExists(closed_dir));
        }

        let recipe = request
            .recipe
            .as_deref()
            .map(|name| Recipe::load(&self.layout.recipes_path(), name))
            .transpose()?;
        let manifest = recipe.as_ref().map(|r| &r.manifest);

        let description = request
            .description
            .clone()
            .or_else(|| manifest.and_then(|m| m.description.clone()))
            .unwrap_or_default();
        let url_template = request
            .url_template
            .clone()
            .or_else(|| manifest.and_then(|m| m.url.clone()))
            .or_else(|| self.default_url_template.clone());
        let metadata = match url_template {
            Some(template) => Metadata::instantiate(&description, &template, id)?,
            None => Metadata {
                description,
                url: String::new(),
            },
        };

        let mut files = request.files.clone();
        if let Some(manifest) = manifest {
            for name in &manifest.files {
                if !files.contains(name) {
                    files.push(name.clone());
                }
            }
        }
        stager::validate_file_names(&files)?;

        let staging_dir = self
            .layout
            .tickets_path()
            .join(format!("{STAGING_PREFIX}{id}"));
        if staging_dir.exists() {
            tracing::debug!(path = %staging_dir.display(), "Removing stale staging directory");
            fs::remove_dir_all(&staging_dir).map_err(|e| TicketError::io(&staging_dir, e))?;
        }
        fs::create_dir(&staging_dir).map_err(|e| TicketError::io(&staging_dir, e))?;

        let staged = self
            .stage(
                &staging_dir,
                &files,
                recipe.as_ref(),
                &request.copy,
                &metadata,
            )
            .and_then(|()| {
                fs::rename(&staging_dir, &ticket_dir)
                    .map_err(|e| TicketError::io(&ticket_dir, e))
            });
        if let Err(e) = staged {
            self.discard(&staging_dir);
            return Err(e);
        }

        self.sink.success(&format!("Ticket created - {id}"));
        Ok(ticket_dir)
    }

    fn stage(
        &self,
        dir: &Path,
        files: &[String],
        recipe: Option<&Recipe>,
        copy: &[String],
        metadata: &Metadata,
    ) -> Result<()> {
        let stager = FileStager::new(self.sink);
        stager.create_empty(files, dir)?;

        if let Some(recipe) = recipe {
            let selectors = if copy.is_empty() {
                recipe.manifest.copy.as_slice()
            } else {
                copy
            };
            let selection = CopySelection::from_selectors(selectors);
            stager.copy_from_recipe(&selection, &recipe.dir, dir)?;
        }

        metadata::write(dir, metadata)
    }

    fn discard(&self, staging_dir: &Path) {
        if let Err(e) = fs::remove_dir_all(staging_dir) {
            self.sink.warn(&format!(
                "Could not remove staging directory {}: {e}",
                staging_dir.display()
            ));
        }
    }

    /// Move an open ticket to the closed root
    pub fn close(&self, id: &TicketId) -> Result<PathBuf> {
        let dest = self.transition(id, TicketState::Open, TicketState::Closed)?;
        self.sink.success(&format!("Ticket closed - {id}"));
        Ok(dest)
    }

    /// Move a closed ticket back to the open root
    pub fn reopen(&self, id: &TicketId) -> Result<PathBuf> {
        let dest = self.transition(id, TicketState::Closed, TicketState::Open)?;
        self.sink.success(&format!("Ticket reopened - {id}"));
        Ok(dest)
    }

    fn transition(&self, id: &TicketId, from: TicketState, to: TicketState) -> Result<PathBuf> {
        let source = id.path_under(&from.root(self.layout));
        if !source.exists() {
            return Err(TicketError::NotFound(source));
        }

        let dest = id.path_under(&to.root(self.layout));
        if dest.exists() {
            return Err(TicketError::io(
                &dest,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("a {} ticket named '{id}' already exists", to.as_str()),
                ),
            ));
        }

        fs::rename(&source, &dest).map_err(|e| TicketError::io(&source, e))?;
        tracing::debug!(
            ticket = %id,
            from = from.as_str(),
            to = to.as_str(),
            "Moved ticket directory"
        );
        Ok(dest)
    }
}
