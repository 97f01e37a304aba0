//! Saving and restoring an in-progress match.
//!
//! [`SessionRecord`] is the explicit save schema. A [`SaveStore`] decides
//! where records live; the engine only ever talks to that trait.

use alloc::string::String;
use core::fmt;

mod record;
mod store;

#[cfg(feature = "std")]
mod codec;
#[cfg(feature = "std")]
mod file;

pub use record::{AiRecord, BoardRecord, CellRecord, SessionRecord, ShipRecord};
pub use store::{MemoryStore, SaveStore};

#[cfg(feature = "std")]
pub use codec::{decode, encode};
#[cfg(feature = "std")]
pub use file::FileStore;

/// Errors returned while saving or restoring a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Nothing has been saved.
    NotFound,
    /// The save could not be read or written.
    Io(String),
    /// The save exists but does not describe a valid match.
    Corrupt(String),
    /// The session has no store attached.
    NoStore,
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::NotFound => write!(f, "No saved match found"),
            PersistError::Io(msg) => write!(f, "Save I/O failed: {}", msg),
            PersistError::Corrupt(msg) => write!(f, "Saved match is corrupt: {}", msg),
            PersistError::NoStore => write!(f, "No save store attached"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PersistError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PersistError::NotFound
        } else {
            PersistError::Io(err.to_string())
        }
    }
}
