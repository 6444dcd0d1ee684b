use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{GameDataError, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Weapon {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            img: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub clear_previous_weapons: bool,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataMeta {
    #[serde(default)]
    pub author: String,
}

/// The static game-data feed: stages in progression order, each listing the
/// weapons that become obtainable at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(rename = "$meta", default)]
    pub meta: DataMeta,
    pub terraria_version: String,
    pub stages: Vec<Stage>,
}

impl GameData {
    pub fn from_json(raw: &str) -> Result<Self, GameDataError> {
        let data: GameData = serde_json::from_str(raw)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), GameDataError> {
        if self.stages.is_empty() {
            return Err(GameDataError::NoStages);
        }
        Ok(())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn clamp_stage(&self, index: usize) -> usize {
        index.min(self.stages.len().saturating_sub(1))
    }

    pub fn find_weapon(&self, name: &str) -> Option<&Weapon> {
        self.stages
            .iter()
            .flat_map(|stage| stage.weapons.iter())
            .find(|weapon| weapon.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    Name,
    Availability,
    #[default]
    AvailabilityAndName,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [
        SortMode::Name,
        SortMode::Availability,
        SortMode::AvailabilityAndName,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Availability => "availability",
            SortMode::AvailabilityAndName => "availabilityAndName",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortMode {
    type Err = TrackerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        SortMode::ALL
            .into_iter()
            .find(|mode| {
                mode.key().eq_ignore_ascii_case(wanted)
                    || mode.key().replace("And", "-and-").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| TrackerError::UnknownSortMode(wanted.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
