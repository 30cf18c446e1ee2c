use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

use tck::config::Config;
use tck::env_vars;
use tck::events::TracingSink;
use tck::lifecycle::{CreateRequest, LifecycleEngine, TicketState};
use tck::listing::{self, TicketSummary};
use tck::logging;
use tck::opener::OpenCommand;
use tck::{HomeLayout, TicketError, TicketId};

#[derive(Parser)]
#[command(name = "tck")]
#[command(about = "Personal ticket tracker: one directory per ticket")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Home directory (overrides TCK_HOME_DIR and config)
    #[arg(long, global = true)]
    home: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new ticket directory
    New {
        /// Ticket id (falls back to TCK_ID)
        ids: Vec<String>,

        /// Short description stored in meta.json
        #[arg(short = 'm', long)]
        description: Option<String>,

        /// URL template; '@' is replaced by the ticket id
        #[arg(short, long)]
        url: Option<String>,

        /// Recipe to seed the ticket from
        #[arg(short, long)]
        recipe: Option<String>,

        /// File to create empty (repeatable)
        #[arg(short = 'f', long = "file")]
        files: Vec<String>,

        /// Recipe file to copy, or '*' for all of them (repeatable)
        #[arg(short = 'C', long = "copy", requires = "recipe")]
        copy: Vec<String>,

        /// Open the ticket directory afterwards
        #[arg(short, long)]
        open: bool,
    },

    /// Move a ticket to the .closed/ directory
    Close {
        /// Ticket id (falls back to TCK_ID)
        ids: Vec<String>,
    },

    /// Move a ticket out of the .closed/ directory
    Reopen {
        /// Ticket id (falls back to TCK_ID)
        ids: Vec<String>,
    },

    /// List tickets with their description and URL
    Ls {
        /// List closed tickets instead of open ones
        #[arg(long)]
        closed: bool,
    },

    /// Open a ticket directory with TCK_EDITOR or the platform default
    Open {
        /// Ticket id (falls back to TCK_ID)
        ids: Vec<String>,

        /// Look for the ticket among closed tickets
        #[arg(long)]
        closed: bool,
    },

    /// Create the home directory layout and a default config file
    Init,

    /// Show the environment variables tck reads
    Env,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config, cli.debug);

    let explicit_home = cli.home.or_else(|| env_vars::lookup(env_vars::HOME_DIR));
    let home_base = config.home_base(explicit_home.as_deref())?;
    tracing::debug!(home = %home_base.display(), "Resolved home directory");

    let sink = TracingSink;

    match cli.command {
        Commands::New {
            ids,
            description,
            url,
            recipe,
            files,
            copy,
            open,
        } => {
            let layout = HomeLayout::resolve_or_create(&home_base)?;
            let mut request = CreateRequest::new(resolve_id(&ids)?);
            request.description = description;
            request.url_template = url;
            request.recipe = recipe;
            request.files = files;
            request.copy = copy;

            let engine = LifecycleEngine::new(&layout, &sink)
                .with_default_url_template(config.defaults.url.clone());
            let ticket_dir = engine.create(&request)?;
            println!("{}", ticket_dir.display());

            if open {
                open_with(&config, &ticket_dir)?;
            }
        }
        Commands::Close { ids } => {
            let layout = HomeLayout::resolve_existing(&home_base)?;
            let id = resolve_id(&ids)?;
            LifecycleEngine::new(&layout, &sink).close(&id)?;
        }
        Commands::Reopen { ids } => {
            let layout = HomeLayout::resolve_existing(&home_base)?;
            let id = resolve_id(&ids)?;
            LifecycleEngine::new(&layout, &sink).reopen(&id)?;
        }
        Commands::Ls { closed } => {
            let layout = HomeLayout::resolve_existing(&home_base)?;
            let state = if closed {
                TicketState::Closed
            } else {
                TicketState::Open
            };
            let tickets = listing::list_tickets(&state.root(&layout), &sink)?;
            print_tickets(&tickets, state);
        }
        Commands::Open { ids, closed } => {
            let layout = HomeLayout::resolve_existing(&home_base)?;
            let id = resolve_id(&ids)?;
            let state = if closed {
                TicketState::Closed
            } else {
                TicketState::Open
            };
            let ticket_dir = id.path_under(&state.root(&layout));
            if !ticket_dir.exists() {
                return Err(TicketError::NotFound(ticket_dir).into());
            }
            open_with(&config, &ticket_dir)?;
        }
        Commands::Init => {
            let layout = HomeLayout::resolve_or_create(&home_base)?;
            println!("Home ready at {}", layout.base().display());

            if let Some(path) = Config::user_config_path() {
                if !path.exists() {
                    config.save_to(&path)?;
                    println!("Wrote default config to {}", path.display());
                }
            }
        }
        Commands::Env => {
            print_env_vars();
        }
    }

    Ok(())
}

fn resolve_id(ids: &[String]) -> Result<TicketId> {
    let fallback = env_vars::lookup(env_vars::TICKET_ID);
    Ok(TicketId::resolve(ids, fallback.as_deref())?)
}

fn open_with(config: &Config, ticket_dir: &Path) -> Result<()> {
    let tokens = env_vars::lookup(env_vars::EDITOR)
        .map(|value| OpenCommand::tokens_from(&value))
        .unwrap_or_else(|| config.open.command.clone());
    let opener = OpenCommand::resolve(&tokens, &TracingSink)?;
    opener
        .spawn(ticket_dir)
        .with_context(|| format!("Failed to open {}", ticket_dir.display()))
}

fn print_tickets(tickets: &[TicketSummary], state: TicketState) {
    if tickets.is_empty() {
        println!("No {} tickets", state.as_str());
        return;
    }

    let id_width = tickets
        .iter()
        .map(|t| t.id.chars().count())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let description_width = tickets
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(0)
        .max("DESCRIPTION".len());

    println!(
        "{:<id_width$}  {:<description_width$}  URL",
        "ID", "DESCRIPTION"
    );
    println!("{}", "─".repeat(id_width + description_width + 9));
    for ticket in tickets {
        println!(
            "{:<id_width$}  {:<description_width$}  {}",
            ticket.id, ticket.description, ticket.url
        );
    }
}

fn print_env_vars() {
    for (category, vars) in env_vars::env_vars_by_category() {
        println!("{}", category.display_name());
        println!("{}", "─".repeat(60));
        for var in vars {
            println!("  {}", var.name);
            println!("      {}", var.description);
            if let Some(default) = var.default {
                println!("      default: {default}");
            }
            if let Some(example) = var.example {
                println!("      example: {example}");
            }
        }
        println!();
    }
}
