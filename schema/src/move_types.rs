use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

/// Stats that carry a battle stage. HP has no stage and is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
    Acc,
}

impl StatType {
    pub const ALL: [StatType; 6] = [
        StatType::Atk,
        StatType::Def,
        StatType::SpAtk,
        StatType::SpDef,
        StatType::Spe,
        StatType::Acc,
    ];

    /// Position of this stat in a stage array.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Special Attack"),
            StatType::SpDef => write!(f, "Special Defense"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "accuracy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Target,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User => write!(f, "User"),
            Target::Target => write!(f, "Target"),
        }
    }
}

/// Persistent statuses a move or item can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Freeze,
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusType::Burn => write!(f, "burn"),
            StatusType::Poison => write!(f, "poison"),
            StatusType::Paralysis => write!(f, "paralysis"),
            StatusType::Sleep => write!(f, "sleep"),
            StatusType::Freeze => write!(f, "freeze"),
        }
    }
}

/// Volatile conditions: cleared on switch-out, independent of the status slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatileType {
    Confusion,
    Taunt,
}

impl fmt::Display for VolatileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatileType::Confusion => write!(f, "confusion"),
            VolatileType::Taunt => write!(f, "taunt"),
        }
    }
}
