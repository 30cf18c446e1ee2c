//! Centralized environment variable registry.
//!
//! Single source of truth for every environment variable tck reads. It is
//! consumed by `tck env` and by the binary when resolving its inputs.
//!
//! `TCK_HOME_DIR`, `TCK_ID` and `TCK_EDITOR` are read directly. Every other
//! variable is a config override using the `TCK_` prefix with `__` separator
//! for nested config paths (e.g., `TCK_LOGGING__LEVEL`).

/// Base directory holding `tickets/` and `recipes/`
pub const HOME_DIR: &str = "TCK_HOME_DIR";
/// Ticket id used when none is passed on the command line
pub const TICKET_ID: &str = "TCK_ID";
/// Command used to open ticket directories
pub const EDITOR: &str = "TCK_EDITOR";

/// An environment variable definition
#[derive(Debug, Clone)]
pub struct EnvVar {
    /// Environment variable name (e.g., "TCK_HOME_DIR")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Category for grouping in documentation
    pub category: EnvVarCategory,
    /// Default value if not set
    pub default: Option<&'static str>,
    /// Example value for documentation
    pub example: Option<&'static str>,
}

/// Categories for organizing environment variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVarCategory {
    /// Which ticket a command acts on
    Ticket,
    /// File path configuration
    Paths,
    /// Opening ticket directories
    Open,
    /// Values applied to new tickets
    Defaults,
    /// Logging configuration
    Logging,
}

impl EnvVarCategory {
    /// Display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            EnvVarCategory::Ticket => "Ticket",
            EnvVarCategory::Paths => "Paths",
            EnvVarCategory::Open => "Open",
            EnvVarCategory::Defaults => "Defaults",
            EnvVarCategory::Logging => "Logging",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [EnvVarCategory] {
        &[
            EnvVarCategory::Ticket,
            EnvVarCategory::Paths,
            EnvVarCategory::Open,
            EnvVarCategory::Defaults,
            EnvVarCategory::Logging,
        ]
    }
}

/// Static registry of all documented environment variables
pub static ENV_VARS: &[EnvVar] = &[
    // === Ticket ===
    EnvVar {
        name: TICKET_ID,
        description: "Ticket id used when a command is run without an explicit id",
        category: EnvVarCategory::Ticket,
        default: None,
        example: Some("PROJ-123"),
    },
    // === Paths ===
    EnvVar {
        name: HOME_DIR,
        description: "Base directory holding tickets/, tickets/.closed/ and recipes/",
        category: EnvVarCategory::Paths,
        default: Some("~/.tck"),
        example: Some("~/work/tickets"),
    },
    EnvVar {
        name: "TCK_PATHS__HOME",
        description: "Config override for the home directory (TCK_HOME_DIR wins)",
        category: EnvVarCategory::Paths,
        default: None,
        example: Some("/srv/tck"),
    },
    // === Open ===
    EnvVar {
        name: EDITOR,
        description: "Command used to open a ticket directory; the path is appended",
        category: EnvVarCategory::Open,
        default: Some("open / xdg-open / explorer"),
        example: Some("code --new-window"),
    },
    // === Defaults ===
    EnvVar {
        name: "TCK_DEFAULTS__URL",
        description: "URL template for new tickets; '@' is replaced by the ticket id",
        category: EnvVarCategory::Defaults,
        default: None,
        example: Some("https://jira.example.com/browse/@"),
    },
    // === Logging ===
    EnvVar {
        name: "TCK_LOGGING__LEVEL",
        description: "Log level filter (trace, debug, info, warn, error)",
        category: EnvVarCategory::Logging,
        default: Some("info"),
        example: Some("debug"),
    },
    EnvVar {
        name: "RUST_LOG",
        description: "Full tracing filter directive; overrides TCK_LOGGING__LEVEL",
        category: EnvVarCategory::Logging,
        default: None,
        example: Some("tck=debug"),
    },
];

/// Read a variable, treating an empty value as unset
pub fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Get all environment variables for a given category
pub fn env_vars_for_category(category: EnvVarCategory) -> impl Iterator<Item = &'static EnvVar> {
    ENV_VARS.iter().filter(move |v| v.category == category)
}

/// Get environment variables grouped by category
pub fn env_vars_by_category() -> Vec<(EnvVarCategory, Vec<&'static EnvVar>)> {
    EnvVarCategory::all()
        .iter()
        .map(|cat| {
            let vars: Vec<&EnvVar> = env_vars_for_category(*cat).collect();
            (*cat, vars)
        })
        .filter(|(_, vars)| !vars.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_env_vars_have_descriptions() {
        for var in ENV_VARS {
            assert!(
                !var.description.is_empty(),
                "EnvVar {} has empty description",
                var.name
            );
        }
    }

    #[test]
    fn test_env_vars_use_tck_prefix() {
        for var in ENV_VARS.iter().filter(|v| v.name != "RUST_LOG") {
            assert!(
                var.name.starts_with("TCK_"),
                "EnvVar {} does not have TCK_ prefix",
                var.name
            );
        }
    }

    #[test]
    fn test_env_vars_by_category_covers_every_category() {
        let grouped = env_vars_by_category();
        assert_eq!(grouped.len(), EnvVarCategory::all().len());

        let (category, vars) = &grouped[0];
        assert_eq!(*category, EnvVarCategory::Ticket);
        assert_eq!(vars[0].name, TICKET_ID);
    }

    #[test]
    fn test_lookup_treats_unset_as_none() {
        assert_eq!(lookup("TCK_TEST_DEFINITELY_UNSET_VARIABLE"), None);
    }
}
