//! Roster model: who is registered in the game session.
//!
//! Masters and characters are kept in two ordered collections. Authentication
//! checks masters first and reports which kind of record matched through
//! [`Principal`].

pub mod registry;
pub mod types;

pub use registry::Roster;
pub use types::{parse_level, Archetype, Character, Master, Principal};
