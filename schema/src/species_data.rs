use crate::ElementalType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    /// Stats in canonical order: HP, Atk, Def, SpA, SpD, Spe.
    pub fn to_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    pub id: u16,
    pub name: String,
    pub types: Vec<ElementalType>,
    pub base_stats: BaseStats,
    /// Move names, resolved against the move definitions of the same catalog.
    #[serde(default)]
    pub default_moves: Vec<String>,
}
