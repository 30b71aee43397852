use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// Index of a participant's column in the day matrix
pub type ParticipantIdx = usize;

/// One raw display name and the canonical short name it resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Name exactly as it appears in the chat transcript (case-sensitive)
    pub display_name: String,
    /// Canonical short name used as the matrix column header
    pub short_name: String,
}

impl PlayerEntry {
    pub fn new(display_name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            short_name: short_name.into(),
        }
    }
}

/// Configuration for the display-name lookup table
///
/// Entry order is significant: the first appearance of each short name fixes
/// that participant's column, and column order drives every tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub players: Vec<PlayerEntry>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            players: vec![
                PlayerEntry::new("Josiah Plett", "Josiah"),
                PlayerEntry::new("Bob McBobbins", "Bobby"),
            ],
        }
    }
}

impl RosterConfig {
    /// Load a roster from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TallyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a roster from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the resolved lookup table
    pub fn build(&self) -> Result<Roster> {
        if self.players.is_empty() {
            return Err(TallyError::Roster("roster has no players".to_string()));
        }

        let mut participants: Vec<String> = Vec::new();
        let mut lookup: HashMap<String, ParticipantIdx> = HashMap::new();

        for entry in &self.players {
            if entry.display_name.trim().is_empty() || entry.short_name.trim().is_empty() {
                return Err(TallyError::Roster(format!(
                    "empty name in entry {:?} -> {:?}",
                    entry.display_name, entry.short_name
                )));
            }

            let idx = match participants.iter().position(|p| *p == entry.short_name) {
                Some(idx) => idx,
                None => {
                    participants.push(entry.short_name.clone());
                    participants.len() - 1
                }
            };

            if lookup.insert(entry.display_name.clone(), idx).is_some() {
                return Err(TallyError::Roster(format!(
                    "display name {:?} listed more than once",
                    entry.display_name
                )));
            }
        }

        Ok(Roster {
            participants,
            lookup,
        })
    }
}

/// Resolved, immutable display-name lookup table
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<String>,
    lookup: HashMap<String, ParticipantIdx>,
}

impl Roster {
    /// Resolve a raw display name to its participant column
    pub fn resolve(&self, display_name: &str) -> Option<ParticipantIdx> {
        self.lookup.get(display_name).copied()
    }

    /// Canonical participant names in column order
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn name(&self, idx: ParticipantIdx) -> Option<&str> {
        self.participants.get(idx).map(String::as_str)
    }

    /// Number of participant columns
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
