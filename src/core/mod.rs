pub mod draw;
pub mod partition;
pub mod roster;
pub mod shuffle;
pub mod state;

pub use crate::domain::model::{Entry, EntryId, Group, View};
pub use crate::domain::ports::{Storage, TextGenerator};
pub use crate::utils::error::Result;
