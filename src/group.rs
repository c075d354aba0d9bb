// Group input — speakers and their turns, read from JSON.
//
// A group file holds every group to score in one array. Speaker order
// within a group is meaningful: pair rows are emitted in that order.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One speaker's contribution to a group: a stable identifier plus raw text
/// turns in conversation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    pub turns: Vec<String>,
}

/// A group of speakers scored together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupData {
    pub id: String,
    pub speakers: Vec<Speaker>,
}

/// Read all groups from a JSON file:
/// `[{"id": "...", "speakers": [{"id": "...", "turns": ["..."]}]}]`
pub fn read_groups(path: &Path) -> Result<Vec<GroupData>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read group file {}", path.display()))?;
    let groups: Vec<GroupData> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse group file {}", path.display()))?;
    Ok(groups)
}
