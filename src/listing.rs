//! Reads the metadata of every ticket under a root for display

use std::fs;
use std::path::Path;

use crate::error::{Result, TicketError};
use crate::events::EventSink;
use crate::metadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub id: String,
    pub description: String,
    pub url: String,
}

/// Summaries of the ticket directories directly under `root`, sorted by id.
///
/// Hidden directories (`.closed`, staging leftovers) are not tickets.
/// Tickets whose `meta.json` is missing or malformed are reported to the
/// sink and left out.
pub fn list_tickets(root: &Path, sink: &dyn EventSink) -> Result<Vec<TicketSummary>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| TicketError::io(root, e))? {
        let entry = entry.map_err(|e| TicketError::io(root, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        dirs.push((name, entry.path()));
    }
    dirs.sort();

    let mut tickets = Vec::new();
    for (id, path) in dirs {
        match metadata::read(&path) {
            Ok(meta) => tickets.push(TicketSummary {
                id,
                description: meta.description,
                url: meta.url,
            }),
            Err(e) => sink.error(&format!("Error reading metadata of {id}: {e}")),
        }
    }

    Ok(tickets)
}
