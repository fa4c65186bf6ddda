//! attrpg - tabletop RPG session manager
//!
//! Tracks game masters and player characters for a table, authenticates
//! them by name and password, and keeps the roster in a plain text file
//! between runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod roster;
pub mod session;
pub mod storage;
pub mod version;

pub use error::{Error, ErrorCode, Result};
pub use roster::{Archetype, Character, Master, Principal, Roster};
pub use session::{Menu, Session};
pub use storage::{LoadOutcome, RosterStore};
