//! Core types for the roster: identities, masters, characters and archetypes.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Archetype
// ─────────────────────────────────────────────────────────────────

/// The four fixed character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Warrior,
    Mage,
    Archer,
    Rogue,
}

impl Archetype {
    /// Label used for input, display and the save file.
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Warrior => "Guerreiro",
            Archetype::Mage => "Mago",
            Archetype::Archer => "Arqueiro",
            Archetype::Rogue => "Ladino",
        }
    }

    /// All archetypes in menu order.
    pub fn all() -> &'static [Archetype] {
        &[
            Archetype::Warrior,
            Archetype::Mage,
            Archetype::Archer,
            Archetype::Rogue,
        ]
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Archetype {
    type Err = Error;

    /// Exact, case-sensitive match against the labels.
    fn from_str(s: &str) -> Result<Self> {
        Archetype::all()
            .iter()
            .copied()
            .find(|a| a.label() == s)
            .ok_or_else(|| Error::unknown_archetype(s))
    }
}

// ─────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────

/// A named principal holding a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    name: String,
    password: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Exact string comparison; no hashing.
    pub fn authenticate(&self, password: &str) -> bool {
        self.password == password
    }
}

// ─────────────────────────────────────────────────────────────────
// Master
// ─────────────────────────────────────────────────────────────────

const MASTER_WELCOME: &str =
    "Bem-vindo à página do Mestre! Aqui você pode gerenciar o jogo quando quiser.";

/// A game master. Checked before characters during authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Master {
    identity: Identity,
}

impl Master {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(name, password),
        }
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn password(&self) -> &str {
        self.identity.password()
    }

    pub fn authenticate(&self, password: &str) -> bool {
        self.identity.authenticate(password)
    }

    /// Text of the master administration page.
    pub fn welcome_page(&self) -> &'static str {
        MASTER_WELCOME
    }
}

// ─────────────────────────────────────────────────────────────────
// Character
// ─────────────────────────────────────────────────────────────────

/// A player character. Level is always >= 1 and only ever increases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    identity: Identity,
    archetype: Archetype,
    level: u64,
}

impl Character {
    /// Create a character; rejects level 0.
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        archetype: Archetype,
        level: u64,
    ) -> Result<Self> {
        if level == 0 {
            return Err(Error::invalid_level(level.to_string()));
        }
        Ok(Self {
            identity: Identity::new(name, password),
            archetype,
            level,
        })
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn password(&self) -> &str {
        self.identity.password()
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn authenticate(&self, password: &str) -> bool {
        self.identity.authenticate(password)
    }

    /// Increase the level by one.
    ///
    /// Saturates at `u64::MAX`, which no amount of play reaches.
    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// One-line summary: `Nome: {name}, Classe: {archetype}, Nível: {level}`.
    pub fn describe(&self) -> String {
        format!(
            "Nome: {}, Classe: {}, Nível: {}",
            self.name(),
            self.archetype,
            self.level
        )
    }
}

/// Parse an operator- or file-supplied level: an integer >= 1.
pub fn parse_level(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(level) if level >= 1 => Ok(level),
        _ => Err(Error::invalid_level(input)),
    }
}

// ─────────────────────────────────────────────────────────────────
// Principal
// ─────────────────────────────────────────────────────────────────

/// Result of a successful authentication: which record matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal<'a> {
    Master(&'a Master),
    Character(&'a Character),
}

impl Principal<'_> {
    pub fn name(&self) -> &str {
        match self {
            Principal::Master(m) => m.name(),
            Principal::Character(c) => c.name(),
        }
    }

    pub fn is_master(&self) -> bool {
        matches!(self, Principal::Master(_))
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
