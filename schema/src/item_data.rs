use crate::StatusType;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ItemCategory {
    Medicine,
    #[strum(to_string = "Poke Ball")]
    Pokeball,
    Battle,
    #[strum(to_string = "Key Item")]
    KeyItem,
    Berry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffectDefinition {
    HealHp(u16),
    /// `None` cures every status.
    CureStatus(Option<Vec<StatusType>>),
    /// Percentage of max HP restored, 1..=100.
    Revive(u8),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: u16,
    pub name: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub description: String,
    pub effect: ItemEffectDefinition,
}
