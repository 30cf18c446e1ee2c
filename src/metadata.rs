//! Per-ticket `meta.json`: a description plus the ticket's instantiated URL.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TicketError};
use crate::ticket::TicketId;

pub const META_FILE: &str = "meta.json";

/// Placeholder replaced by the ticket id in a URL template
pub const ID_PLACEHOLDER: char = '@';

/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub description: String,
    pub url: String,
}

impl Metadata {
    /// Instantiate a URL template for `id`. The template is validated first.
    pub fn instantiate(description: &str, url_template: &str, id: &TicketId) -> Result<Self> {
        validate_url_template(url_template)?;
        Ok(Self {
            description: description.to_string(),
            url: url_template.replacen(ID_PLACEHOLDER, id.as_str(), 1),
        })
    }
}

/// Check that `template` is an http(s) URL with exactly one `@`.
///
/// Both checks always run; the error carries every failing reason.
pub fn validate_url_template(template: &str) -> Result<()> {
    let mut reasons = Vec::new();

    match Url::parse(template) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => reasons.push(format!(
            "URL scheme must be http or https, got '{}'",
            parsed.scheme()
        )),
        Err(e) => reasons.push(format!("not a valid URL ({e})")),
    }

    let placeholders = template.matches(ID_PLACEHOLDER).count();
    if placeholders != 1 {
        reasons.push(format!(
            "URL must contain exactly one '{ID_PLACEHOLDER}' symbol, found {placeholders}"
        ));
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(TicketError::InvalidUrl {
            url: template.to_string(),
            reason: reasons.join("; "),
        })
    }
}

/// Encode the `meta.json` text for a ticket
pub fn render(description: &str, url_template: &str, id: &TicketId) -> Result<String> {
    let metadata = Metadata::instantiate(description, url_template, id)?;
    to_json(&metadata)
}

fn to_json(metadata: &Metadata) -> Result<String> {
    serde_json::to_string_pretty(metadata)
        .map_err(|source| TicketError::Parse { path: None, source })
}

/// Decode `meta.json` bytes
pub fn parse(bytes: &[u8]) -> Result<Metadata> {
    serde_json::from_slice(bytes).map_err(|source| TicketError::Parse { path: None, source })
}

/// Write `meta.json` into a ticket directory
pub fn write(ticket_dir: &Path, metadata: &Metadata) -> Result<()> {
    let path = ticket_dir.join(META_FILE);
    let mut contents = to_json(metadata)?;
    contents.push('\n');
    fs::write(&path, contents).map_err(|e| TicketError::io(&path, e))
}

/// Read `meta.json` from a ticket directory
pub fn read(ticket_dir: &Path) -> Result<Metadata> {
    let path = ticket_dir.join(META_FILE);
    let bytes = fs::read(&path).map_err(|e| TicketError::io(&path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| TicketError::Parse {
        path: Some(path),
        source,
    })
}
