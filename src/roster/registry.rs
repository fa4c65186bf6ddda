//! In-memory roster of masters and characters for one session.

use tracing::debug;

use super::types::{Character, Master, Principal};

/// Ordered collections of masters and characters.
///
/// Names are not required to be unique. Lookups scan in insertion order and
/// stop at the first match, so duplicates resolve to the earliest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    characters: Vec<Character>,
    masters: Vec<Master>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_character(&mut self, character: Character) {
        debug!(
            name = %character.name(),
            archetype = %character.archetype(),
            level = character.level(),
            "Character added"
        );
        self.characters.push(character);
    }

    /// Remove every character named exactly `name`. Returns how many went.
    pub fn remove_character(&mut self, name: &str) -> usize {
        let before = self.characters.len();
        self.characters.retain(|c| c.name() != name);
        let removed = before - self.characters.len();
        debug!(name = %name, removed, "Characters removed");
        removed
    }

    pub fn add_master(&mut self, master: Master) {
        debug!(name = %master.name(), "Master added");
        self.masters.push(master);
    }

    /// Level up every character named exactly `name`. Returns how many.
    pub fn level_up(&mut self, name: &str) -> usize {
        let mut count = 0;
        for character in self.characters.iter_mut().filter(|c| c.name() == name) {
            character.level_up();
            count += 1;
        }
        count
    }

    /// Find the first master, then the first character, with a matching
    /// name and password.
    pub fn authenticate(&self, name: &str, password: &str) -> Option<Principal<'_>> {
        if let Some(master) = self
            .masters
            .iter()
            .find(|m| m.name() == name && m.authenticate(password))
        {
            return Some(Principal::Master(master));
        }

        self.characters
            .iter()
            .find(|c| c.name() == name && c.authenticate(password))
            .map(Principal::Character)
    }

    /// Characters in insertion order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Masters in insertion order.
    pub fn masters(&self) -> &[Master] {
        &self.masters
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn master_count(&self) -> usize {
        self.masters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.masters.is_empty()
    }
}
