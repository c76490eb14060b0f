use crate::errors::{CatalogError, CatalogResult};
use schema::{
    ElementalType, MoveCategory, MoveDefinition, MoveEffectDefinition, StatType, StatusType, Target,
    VolatileType,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Dense index of a move inside its catalog. The two engine-internal moves
/// use reserved ids at the top of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub u16);

impl MoveId {
    pub const STRUGGLE: MoveId = MoveId(u16::MAX);
    pub const SELF_HIT: MoveId = MoveId(u16::MAX - 1);
}

pub const DEFAULT_SLEEP_TURNS: (u8, u8) = (2, 4);
pub const DEFAULT_CONFUSION_TURNS: (u8, u8) = (2, 5);
pub const DEFAULT_TAUNT_TURNS: (u8, u8) = (3, 3);

/// What a move does besides (or instead of) dealing damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Damage,
    StatChange {
        target: Target,
        stat: StatType,
        stages: i8,
        chance: u8,
    },
    InflictStatus {
        status: Option<StatusType>,
        volatile: Option<VolatileType>,
        chance: u8,
        /// Inclusive duration range in turns, already defaulted per condition.
        duration: (u8, u8),
    },
    Recoil {
        percent: u8,
    },
    /// Fixed quarter-of-max-HP self damage, independent of damage dealt.
    Struggle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: MoveId,
    pub name: Arc<str>,
    pub category: MoveCategory,
    pub element: ElementalType,
    pub power: u8,
    pub accuracy: u8,
    pub max_pp: u8,
    pub priority: i8,
    pub kind: MoveKind,
}

impl Move {
    /// Validate a definition and resolve it into a move.
    pub fn from_definition(definition: &MoveDefinition) -> CatalogResult<Self> {
        let invalid = |reason: &str| CatalogError::Invalid {
            kind: "move",
            name: definition.name.clone(),
            reason: reason.to_string(),
        };

        if definition.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if definition.accuracy > 100 {
            return Err(invalid("accuracy must be within 0..=100"));
        }
        if definition.pp == 0 {
            return Err(invalid("pp must be positive"));
        }
        if definition.category == MoveCategory::Status && definition.power != 0 {
            return Err(invalid("status moves have no power"));
        }

        let kind = match definition.effect {
            MoveEffectDefinition::Damage => MoveKind::Damage,
            MoveEffectDefinition::StatChange {
                target,
                stat,
                stages,
                chance,
            } => {
                if stages == 0 || stages.abs() > 6 {
                    return Err(invalid("stat stages must be within -6..=6 and non-zero"));
                }
                if chance == 0 || chance > 100 {
                    return Err(invalid("effect chance must be within 1..=100"));
                }
                MoveKind::StatChange {
                    target,
                    stat,
                    stages,
                    chance,
                }
            }
            MoveEffectDefinition::InflictStatus {
                status,
                volatile,
                chance,
                duration,
            } => {
                if status.is_none() && volatile.is_none() {
                    return Err(invalid("a status move needs a status or a volatile condition"));
                }
                if chance == 0 || chance > 100 {
                    return Err(invalid("effect chance must be within 1..=100"));
                }
                let duration = match duration {
                    Some((low, high)) if low == 0 || low > high => {
                        return Err(invalid("duration must be a non-empty range of positive turns"));
                    }
                    Some(range) => range,
                    None => match (status, volatile) {
                        (_, Some(VolatileType::Confusion)) => DEFAULT_CONFUSION_TURNS,
                        (_, Some(VolatileType::Taunt)) => DEFAULT_TAUNT_TURNS,
                        _ => DEFAULT_SLEEP_TURNS,
                    },
                };
                MoveKind::InflictStatus {
                    status,
                    volatile,
                    chance,
                    duration,
                }
            }
            MoveEffectDefinition::Recoil { percent } => {
                if percent == 0 || percent > 100 {
                    return Err(invalid("recoil percent must be within 1..=100"));
                }
                MoveKind::Recoil { percent }
            }
        };

        Ok(Self {
            id: MoveId(definition.id),
            name: Arc::from(definition.name.as_str()),
            category: definition.category,
            element: definition.element,
            power: definition.power,
            accuracy: definition.accuracy,
            max_pp: definition.pp,
            priority: definition.priority,
            kind,
        })
    }

    /// The fallback attack used when no move slot has PP left.
    pub fn struggle() -> Self {
        Self {
            id: MoveId::STRUGGLE,
            name: Arc::from("Struggle"),
            category: MoveCategory::Physical,
            element: ElementalType::TypeNone,
            power: 50,
            accuracy: 100,
            max_pp: 1,
            priority: 0,
            kind: MoveKind::Struggle,
        }
    }

    /// The typeless hit a confused Pokemon deals to itself.
    pub fn self_hit() -> Self {
        Self {
            id: MoveId::SELF_HIT,
            name: Arc::from("Self Hit"),
            category: MoveCategory::Physical,
            element: ElementalType::TypeNone,
            power: 40,
            accuracy: 100,
            max_pp: 1,
            priority: 0,
            kind: MoveKind::Damage,
        }
    }

    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }

    pub fn deals_damage(&self) -> bool {
        !self.is_status() && self.power > 0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Type: {} | {} | Power: {} | Accuracy: {} | PP: {}",
            self.name, self.element, self.category, self.power, self.accuracy, self.max_pp
        )
    }
}
