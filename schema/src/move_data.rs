use crate::{ElementalType, MoveCategory, StatType, StatusType, Target, VolatileType};
use serde::{Deserialize, Serialize};

fn always() -> u8 {
    100
}

/// The behaviour class of a move, beyond its damage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveEffectDefinition {
    #[default]
    Damage,
    StatChange {
        target: Target,
        stat: StatType,
        stages: i8,
        #[serde(default = "always")]
        chance: u8,
    },
    InflictStatus {
        #[serde(default)]
        status: Option<StatusType>,
        #[serde(default)]
        volatile: Option<VolatileType>,
        #[serde(default = "always")]
        chance: u8,
        /// Inclusive turn range; the engine picks a default per condition when absent.
        #[serde(default)]
        duration: Option<(u8, u8)>,
    },
    Recoil {
        percent: u8,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDefinition {
    pub id: u16,
    pub name: String,
    pub category: MoveCategory,
    pub element: ElementalType,
    pub power: u8,
    pub accuracy: u8,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub effect: MoveEffectDefinition,
}
