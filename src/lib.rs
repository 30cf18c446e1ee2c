//! tck - personal ticket tracker keeping one directory per ticket.
//!
//! Open tickets live in `<home>/tickets/<id>/`, closed ones in
//! `<home>/tickets/.closed/<id>/`. New tickets can be seeded from recipes
//! in `<home>/recipes/<name>/` and carry a `meta.json` with a description
//! and a URL.

pub mod config;
pub mod env_vars;
pub mod error;
pub mod events;
pub mod home;
pub mod lifecycle;
pub mod listing;
pub mod logging;
pub mod metadata;
pub mod opener;
pub mod recipe;
pub mod stager;
pub mod ticket;

pub use error::{Result, TicketError};
pub use events::{EventSink, Level, RecordingSink, TracingSink};
pub use home::HomeLayout;
pub use lifecycle::{CreateRequest, LifecycleEngine, TicketState};
pub use metadata::Metadata;
pub use ticket::TicketId;
