use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier assigned at registration. Never reused.
pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Withdrawn,
}

impl PlayerStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerStatus::Active => "in",
            PlayerStatus::Withdrawn => "out",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, PlayerStatus::Active)
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(PlayerStatus::Active),
            "out" => Ok(PlayerStatus::Withdrawn),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Characters a name cannot hold and still fit on one player record line.
const RESERVED: [char; 3] = [';', '\n', '\r'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid name {name:?}: names cannot contain ';' or line breaks")]
pub struct InvalidName {
    pub name: String,
}

/// Rejects names that would split a player record.
pub fn check_name(name: &str) -> Result<(), InvalidName> {
    if name.contains(RESERVED) {
        return Err(InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    first: String,
    last: String,
    status: PlayerStatus,
    opponents: BTreeSet<PlayerId>,
    chips: u32,
}

impl Player {
    pub fn new(id: PlayerId, first: impl Into<String>, last: impl Into<String>, chips: u32) -> Self {
        Self {
            id,
            first: first.into(),
            last: last.into(),
            status: PlayerStatus::Active,
            opponents: BTreeSet::new(),
            chips,
        }
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_opponents(mut self, opponents: impl IntoIterator<Item = PlayerId>) -> Self {
        self.opponents = opponents.into_iter().collect();
        self
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// First and last name joined by a single space. The space is kept even
    /// when the last name is empty so listings line up with stored output.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
    }

    pub fn opponents(&self) -> &BTreeSet<PlayerId> {
        &self.opponents
    }

    pub fn has_faced(&self, other: PlayerId) -> bool {
        self.opponents.contains(&other)
    }

    /// Opponent history only grows; ids already present are ignored.
    pub fn extend_opponents(&mut self, opponents: impl IntoIterator<Item = PlayerId>) {
        self.opponents.extend(opponents);
    }

    pub fn chips(&self) -> u32 {
        self.chips
    }

    pub fn set_chips(&mut self, chips: u32) {
        self.chips = chips;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.full_name(), self.chips)
    }
}
