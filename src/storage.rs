//! Flat-file persistence for the roster.
//!
//! The save file is plain text with two labelled sections:
//!
//! ```text
//! Personagens:
//! <name>,<password>,<archetype>,<level>
//! Mestres:
//! <name>,<password>
//! ```
//!
//! Fields are not escaped, so a comma inside a name or password corrupts the
//! line it is written to.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::roster::{parse_level, Archetype, Character, Master, Roster};

// ─────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────

const CHARACTERS_LABEL: &str = "Personagens:";
const MASTERS_LABEL: &str = "Mestres:";

const CHARACTER_FIELDS: usize = 4;
const MASTER_FIELDS: usize = 2;

// ─────────────────────────────────────────────────────────────────
// Load outcome
// ─────────────────────────────────────────────────────────────────

/// Successful result of [`RosterStore::load`].
///
/// Malformed content and I/O failures are reported as errors instead.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file existed and parsed cleanly.
    Loaded(Roster),
    /// No file at the path; start from an empty roster.
    Missing,
}

impl LoadOutcome {
    pub fn into_roster(self) -> Roster {
        match self {
            LoadOutcome::Loaded(roster) => roster,
            LoadOutcome::Missing => Roster::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Characters,
    Masters,
}

// ─────────────────────────────────────────────────────────────────
// Roster Store
// ─────────────────────────────────────────────────────────────────

/// Reads and writes the roster save file at a fixed path.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the roster. A missing file is [`LoadOutcome::Missing`], not an error.
    pub fn load(&self) -> Result<LoadOutcome> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No save file found, starting empty");
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => {
                return Err(Error::IoRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => return Err(invalid_utf8_line(e.as_bytes(), e.utf8_error().valid_up_to())),
        };

        let roster = decode(&content)?;
        info!(
            path = %self.path.display(),
            characters = roster.character_count(),
            masters = roster.master_count(),
            "Roster loaded"
        );
        Ok(LoadOutcome::Loaded(roster))
    }

    /// Copy the current save file to `<path>.bak`, replacing any older backup.
    ///
    /// Returns the backup path.
    pub fn backup(&self) -> Result<PathBuf> {
        let mut backup = self.path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        fs::copy(&self.path, &backup).map_err(|e| Error::IoWrite {
            path: backup.clone(),
            source: e,
        })?;

        info!(path = %self.path.display(), backup = %backup.display(), "Save file backed up");
        Ok(backup)
    }

    /// Overwrite the save file with the current roster.
    pub fn save(&self, roster: &Roster) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(&self.path, encode(roster)).map_err(|e| Error::IoWrite {
            path: self.path.clone(),
            source: e,
        })?;

        info!(
            path = %self.path.display(),
            characters = roster.character_count(),
            masters = roster.master_count(),
            "Roster saved"
        );
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────

/// Render the roster in the save file format.
pub fn encode(roster: &Roster) -> String {
    let mut out = String::new();

    out.push_str(CHARACTERS_LABEL);
    out.push('\n');
    for c in roster.characters() {
        if c.name().contains(',') || c.password().contains(',') {
            warn!(name = %c.name(), "Character field contains a comma; saved line will not load");
        }
        out.push_str(&format!(
            "{},{},{},{}\n",
            c.name(),
            c.password(),
            c.archetype(),
            c.level()
        ));
    }

    out.push_str(MASTERS_LABEL);
    out.push('\n');
    for m in roster.masters() {
        if m.name().contains(',') || m.password().contains(',') {
            warn!(name = %m.name(), "Master field contains a comma; saved line will not load");
        }
        out.push_str(&format!("{},{}\n", m.name(), m.password()));
    }

    out
}

/// Parse save file text into a roster.
///
/// Section labels may carry surrounding whitespace; blank lines and
/// anything before the first label are ignored. Record lines are taken as
/// written, so padded names and passwords survive a reload. Character lines
/// with an unknown archetype are skipped. The first line with the wrong
/// field count or a bad level aborts the parse.
pub fn decode(text: &str) -> Result<Roster> {
    let mut roster = Roster::new();
    let mut section = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        match line.trim() {
            CHARACTERS_LABEL => {
                section = Some(Section::Characters);
                continue;
            }
            MASTERS_LABEL => {
                section = Some(Section::Masters);
                continue;
            }
            "" => continue,
            _ => {}
        }

        match section {
            None => debug!(line_no, "Ignoring line outside any section"),
            Some(Section::Characters) => {
                if let Some(character) = decode_character(line_no, line)? {
                    roster.add_character(character);
                }
            }
            Some(Section::Masters) => roster.add_master(decode_master(line_no, line)?),
        }
    }

    Ok(roster)
}

/// Report the line holding the first invalid UTF-8 byte at `offset`.
fn invalid_utf8_line(bytes: &[u8], offset: usize) -> Error {
    let (before, after) = bytes.split_at(offset);
    let line_no = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let start = before.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
    let end = after.iter().position(|&b| b == b'\n').map_or(bytes.len(), |i| offset + i);

    let line = String::from_utf8_lossy(&bytes[start..end]);
    Error::malformed_line(line_no, line.trim_end_matches('\r'), "not valid UTF-8")
}

fn split_fields(line_no: usize, line: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != expected {
        return Err(Error::malformed_line(
            line_no,
            line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }
    Ok(fields)
}

/// `Ok(None)` means the line named an unknown archetype and was skipped.
fn decode_character(line_no: usize, line: &str) -> Result<Option<Character>> {
    let fields = split_fields(line_no, line, CHARACTER_FIELDS)?;
    let (name, password, archetype, level) = (fields[0], fields[1], fields[2], fields[3]);

    let level = parse_level(level)
        .map_err(|_| Error::malformed_line(line_no, line, format!("invalid level {:?}", level)))?;

    let archetype = match archetype.parse::<Archetype>() {
        Ok(archetype) => archetype,
        Err(_) => {
            debug!(line_no, archetype = %archetype, "Skipping character with unknown archetype");
            return Ok(None);
        }
    };

    Character::new(name, password, archetype, level)
        .map(Some)
        .map_err(|e| Error::malformed_line(line_no, line, e.to_string()))
}

fn decode_master(line_no: usize, line: &str) -> Result<Master> {
    let fields = split_fields(line_no, line, MASTER_FIELDS)?;
    Ok(Master::new(fields[0], fields[1]))
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
