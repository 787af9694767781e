//! Town structure components.

use serde::{Deserialize, Serialize};

/// A building that can hold residents and carry an infection marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: u32,
    pub name: String,
    pub kind: BuildingKind,
    /// Maximum residents
    pub capacity: u32,
}

impl Building {
    pub fn new(id: u32, name: impl Into<String>, kind: BuildingKind, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Tavern,
    Church,
    Workshop,
    Market,
}

impl BuildingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::House => "House",
            BuildingKind::Tavern => "Tavern",
            BuildingKind::Church => "Church",
            BuildingKind::Workshop => "Workshop",
            BuildingKind::Market => "Market",
        }
    }

    /// Whether citizens are housed here by the town generator.
    pub fn is_dwelling(&self) -> bool {
        matches!(self, BuildingKind::House | BuildingKind::Tavern)
    }
}
