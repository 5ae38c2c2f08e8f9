pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{export::GroupExporter, storage::LocalStorage};
pub use crate::app::{controller::Controller, enrichment::Congratulator, session::Session};
pub use crate::core::{roster::Roster, state::AppState};
pub use crate::domain::model::{Entry, EntryId, Group};
pub use crate::utils::error::{RaffleError, Result};
