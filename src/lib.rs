#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod engine;
pub mod persistence;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;

pub use engine::*;
pub use persistence::{MemoryStore, PersistError, SaveStore, SessionRecord};

#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use persistence::FileStore;
