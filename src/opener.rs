//! Launches the user's file manager or editor on a ticket directory

use std::path::Path;
use std::process::Command;

use crate::error::{Result, TicketError};
use crate::events::EventSink;

/// Program and leading arguments; the ticket path is appended last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCommand {
    program: String,
    args: Vec<String>,
}

impl OpenCommand {
    /// Build from configured tokens, or fall back to the platform opener
    pub fn resolve(tokens: &[String], sink: &dyn EventSink) -> Result<Self> {
        if let Some((program, args)) = tokens.split_first() {
            return Ok(Self {
                program: program.clone(),
                args: args.to_vec(),
            });
        }

        let program = platform_default().ok_or(TicketError::UnsupportedPlatform)?;
        sink.warn("No `TCK_EDITOR` environment variable was set");
        sink.warn(&format!("The global default will be used: `{program}`"));
        Ok(Self {
            program: program.to_string(),
            args: Vec::new(),
        })
    }

    /// Split a `TCK_EDITOR` style value into tokens
    pub fn tokens_from(value: &str) -> Vec<String> {
        value.split_whitespace().map(str::to_string).collect()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn command_for(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(path);
        command
    }

    /// Start the opener without waiting for it to exit
    pub fn spawn(&self, path: &Path) -> Result<()> {
        self.command_for(path)
            .spawn()
            .map(|_| ())
            .map_err(|e| TicketError::io(&self.program, e))
    }
}

fn platform_default() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("open")
    } else if cfg!(target_os = "linux") {
        Some("xdg-open")
    } else if cfg!(target_os = "windows") {
        Some("explorer")
    } else {
        None
    }
}
