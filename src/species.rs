use crate::moves::MoveId;
use schema::{BaseStats, ElementalType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Dense index of a species inside its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

/// Immutable species definition, shared by every individual of the species.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: Arc<str>,
    /// Mono-typed species repeat their type in both positions.
    pub types: (ElementalType, ElementalType),
    pub base_stats: BaseStats,
    pub default_moves: Vec<MoveId>,
}

impl Species {
    pub fn is_dual_typed(&self) -> bool {
        self.types.0 != self.types.1
    }

    pub fn has_type(&self, element: ElementalType) -> bool {
        self.types.0 == element || self.types.1 == element
    }
}

impl fmt::Display for Species {
    /// Detailed, multi-line description: name, types and base stats.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (#{:03})", self.name, self.id.0)?;
        writeln!(f, "--------------------")?;

        write!(f, "Type(s): {}", self.types.0)?;
        if self.is_dual_typed() {
            write!(f, " / {}", self.types.1)?;
        }
        writeln!(f)?;
        writeln!(f, "--------------------")?;

        writeln!(f, "Base Stats:")?;
        let base_stats = &self.base_stats;
        const LABEL_WIDTH: usize = 12;

        writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", base_stats.hp)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", base_stats.attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", base_stats.defense)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Atk", base_stats.sp_attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Def", base_stats.sp_defense)?;
        write!(f, "{:<LABEL_WIDTH$} : {}", "Speed", base_stats.speed)
    }
}
