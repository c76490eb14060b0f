use crate::battle::stats::{clamp_stage, STAGE_MAX, STAGE_MIN};
use crate::errors::{TeamError, TeamResult};
use crate::moves::{Move, MoveId};
use crate::species::{Species, SpeciesId};
use schema::{BaseStats, ElementalType, StatType, StatusType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const MAX_MOVES: usize = 4;
pub const DEFAULT_IV: u8 = 10;
pub const MAX_IV: u8 = 31;

/// Persistent status. Exactly one applies at a time; `Fainted` is terminal
/// except for revive effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusCondition {
    #[default]
    Healthy,
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Freeze,
    Fainted,
}

impl StatusCondition {
    /// The curable status this condition corresponds to, if any.
    pub fn as_status_type(self) -> Option<StatusType> {
        match self {
            StatusCondition::Burn => Some(StatusType::Burn),
            StatusCondition::Poison => Some(StatusType::Poison),
            StatusCondition::Paralysis => Some(StatusType::Paralysis),
            StatusCondition::Sleep => Some(StatusType::Sleep),
            StatusCondition::Freeze => Some(StatusType::Freeze),
            StatusCondition::Healthy | StatusCondition::Fainted => None,
        }
    }
}

impl From<StatusType> for StatusCondition {
    fn from(status: StatusType) -> Self {
        match status {
            StatusType::Burn => StatusCondition::Burn,
            StatusType::Poison => StatusCondition::Poison,
            StatusType::Paralysis => StatusCondition::Paralysis,
            StatusType::Sleep => StatusCondition::Sleep,
            StatusType::Freeze => StatusCondition::Freeze,
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCondition::Healthy => write!(f, "Healthy"),
            StatusCondition::Burn => write!(f, "Burn"),
            StatusCondition::Poison => write!(f, "Poison"),
            StatusCondition::Paralysis => write!(f, "Paralysis"),
            StatusCondition::Sleep => write!(f, "Sleep"),
            StatusCondition::Freeze => write!(f, "Freeze"),
            StatusCondition::Fainted => write!(f, "Fainted"),
        }
    }
}

/// Volatile conditions, each stored as its remaining turns (0 = inactive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VolatileState {
    pub confusion_turns: u8,
    pub taunt_turns: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(move_: &Move) -> Self {
        MoveSlot {
            move_id: move_.id,
            pp: move_.max_pp,
            max_pp: move_.max_pp,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// A battling individual.
///
/// Raw stats, types and the level factor are derived once at construction;
/// everything that changes during a battle is plain `Copy` data apart from
/// the shared surname, so cloning never allocates.
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonInst {
    species: SpeciesId,
    surname: Arc<str>,
    level: u8,
    types: (ElementalType, ElementalType),
    ivs: [u8; 6],
    evs: [u8; 6],
    stats: [u16; 6], // HP (max), ATK, DEF, SP.ATK, SP.DEF, SPD
    level_factor: f64,
    hp: u16,
    status: StatusCondition,
    sleep_turns: u8,
    stages: [i8; 6], // indexed by StatType::index
    volatiles: VolatileState,
    moves: [Option<MoveSlot>; MAX_MOVES],
}

impl PokemonInst {
    /// Create a new Pokemon instance from species data.
    ///
    /// The caller resolves move ids (usually the species' default list) to
    /// their definitions so max PP can be read.
    pub fn new(
        species: &Species,
        level: u8,
        moves: &[&Move],
        ivs: Option<[u8; 6]>,
        evs: Option<[u8; 6]>,
        surname: Option<&str>,
    ) -> TeamResult<Self> {
        if !(1..=100).contains(&level) {
            return Err(TeamError::InvalidLevel(level));
        }
        let ivs = ivs.unwrap_or([DEFAULT_IV; 6]);
        if let Some((index, &value)) = ivs.iter().enumerate().find(|(_, iv)| **iv > MAX_IV) {
            return Err(TeamError::InvalidIv { index, value });
        }
        if moves.len() > MAX_MOVES {
            return Err(TeamError::TooManyMoves(moves.len()));
        }
        let evs = evs.unwrap_or([0; 6]);

        let stats = Self::calculate_stats(&species.base_stats, level, &ivs, &evs);

        let mut move_array = [None; MAX_MOVES];
        for (slot, move_) in move_array.iter_mut().zip(moves) {
            *slot = Some(MoveSlot::new(move_));
        }

        let surname = match surname {
            Some(name) => Arc::from(name),
            None => species.name.clone(),
        };

        Ok(PokemonInst {
            species: species.id,
            surname,
            level,
            types: species.types,
            ivs,
            evs,
            stats,
            level_factor: 2.0 * f64::from(level) / 5.0 + 2.0,
            hp: stats[0],
            status: StatusCondition::Healthy,
            sleep_turns: 0,
            stages: [0; 6],
            volatiles: VolatileState::default(),
            moves: move_array,
        })
    }

    /// Calculate raw stats based on base stats, level, IVs, and EVs.
    /// Integer division throughout; natures are not modelled.
    pub fn calculate_stats(base_stats: &BaseStats, level: u8, ivs: &[u8; 6], evs: &[u8; 6]) -> [u16; 6] {
        let base = base_stats.to_array();
        let level = u32::from(level);

        let mut stats = [0u16; 6];
        for i in 0..6 {
            let base_calculation = 2 * u32::from(base[i]) + u32::from(ivs[i]) + u32::from(evs[i]) / 4;
            let stat = if i == 0 {
                (base_calculation * level) / 100 + level + 10
            } else {
                (base_calculation * level) / 100 + 5
            };
            stats[i] = stat as u16;
        }

        stats
    }

    // === Identity ===

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    pub fn surname(&self) -> &Arc<str> {
        &self.surname
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn types(&self) -> (ElementalType, ElementalType) {
        self.types
    }

    pub fn has_type(&self, element: ElementalType) -> bool {
        self.types.0 == element || self.types.1 == element
    }

    pub fn ivs(&self) -> [u8; 6] {
        self.ivs
    }

    pub fn evs(&self) -> [u8; 6] {
        self.evs
    }

    pub fn level_factor(&self) -> f64 {
        self.level_factor
    }

    // === HP ===

    pub fn hp(&self) -> u16 {
        self.hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn hp_ratio(&self) -> f64 {
        f64::from(self.hp) / f64::from(self.max_hp())
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_fainted(&self) -> bool {
        self.status == StatusCondition::Fainted
    }

    /// Set HP, clamped to `0..=max_hp`. Reaching zero faints the Pokemon.
    ///
    /// Raising HP of a fainted Pokemon goes through [`PokemonInst::revive`].
    pub fn set_hp(&mut self, hp: u16) {
        if self.is_fainted() {
            return;
        }
        self.hp = hp.min(self.max_hp());
        if self.hp == 0 {
            self.faint();
        }
    }

    /// Apply damage, returning the HP actually lost.
    pub fn take_damage(&mut self, damage: u16) -> u16 {
        let before = self.hp;
        self.set_hp(self.hp.saturating_sub(damage));
        before - self.hp
    }

    /// Restore HP, returning the HP actually recovered. Fainted Pokemon are unaffected.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.hp;
        self.set_hp(self.hp.saturating_add(amount));
        self.hp - before
    }

    fn faint(&mut self) {
        self.hp = 0;
        self.status = StatusCondition::Fainted;
        self.sleep_turns = 0;
        self.clear_battle_state();
    }

    /// Bring a fainted Pokemon back with `percent` of its max HP (at least 1).
    pub fn revive(&mut self, percent: u8) {
        let restored = u32::from(self.max_hp()) * u32::from(percent) / 100;
        self.status = StatusCondition::Healthy;
        self.hp = (restored as u16).clamp(1, self.max_hp());
    }

    // === Status ===

    pub fn status(&self) -> StatusCondition {
        self.status
    }

    pub fn sleep_turns(&self) -> u8 {
        self.sleep_turns
    }

    pub(crate) fn set_sleep_turns(&mut self, turns: u8) {
        self.sleep_turns = turns;
    }

    /// Apply a persistent status if the Pokemon is alive and healthy.
    /// `sleep_turns` is only read for sleep.
    pub fn inflict_status(&mut self, status: StatusType, sleep_turns: u8) -> bool {
        if !self.is_alive() || self.status != StatusCondition::Healthy {
            return false;
        }
        self.status = status.into();
        self.sleep_turns = if status == StatusType::Sleep { sleep_turns.max(1) } else { 0 };
        true
    }

    /// Return a living Pokemon to `Healthy`.
    pub fn cure_status(&mut self) {
        if self.is_alive() {
            self.status = StatusCondition::Healthy;
            self.sleep_turns = 0;
        }
    }

    // === Stats and stages ===

    /// Raw (unstaged) value of a battle stat. Accuracy has no raw value.
    pub fn raw_stat(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Atk => self.stats[1],
            StatType::Def => self.stats[2],
            StatType::SpAtk => self.stats[3],
            StatType::SpDef => self.stats[4],
            StatType::Spe => self.stats[5],
            StatType::Acc => 0,
        }
    }

    /// Stage-modified value of a battle stat.
    pub fn stat(&self, stat: StatType) -> u16 {
        crate::battle::stats::apply_stat_stage_multiplier(self.raw_stat(stat), self.stage(stat))
    }

    pub fn attack(&self) -> u16 {
        self.stat(StatType::Atk)
    }

    pub fn defense(&self) -> u16 {
        self.stat(StatType::Def)
    }

    pub fn sp_attack(&self) -> u16 {
        self.stat(StatType::SpAtk)
    }

    pub fn sp_defense(&self) -> u16 {
        self.stat(StatType::SpDef)
    }

    pub fn speed(&self) -> u16 {
        self.stat(StatType::Spe)
    }

    pub fn stage(&self, stat: StatType) -> i8 {
        self.stages[stat.index()]
    }

    pub fn stages(&self) -> [i8; 6] {
        self.stages
    }

    /// Modify a stage by `delta`, clamped to -6..=6.
    /// Returns whether the stored stage actually changed.
    pub fn apply_stage(&mut self, stat: StatType, delta: i8) -> bool {
        let current = self.stages[stat.index()];
        let updated = clamp_stage(i16::from(current) + i16::from(delta));
        self.stages[stat.index()] = updated;
        updated != current
    }

    pub fn can_raise(&self, stat: StatType) -> bool {
        self.stage(stat) < STAGE_MAX
    }

    pub fn can_lower(&self, stat: StatType) -> bool {
        self.stage(stat) > STAGE_MIN
    }

    // === Volatile conditions ===

    pub fn volatiles(&self) -> VolatileState {
        self.volatiles
    }

    pub(crate) fn volatiles_mut(&mut self) -> &mut VolatileState {
        &mut self.volatiles
    }

    pub fn is_confused(&self) -> bool {
        self.volatiles.confusion_turns > 0
    }

    pub fn is_taunted(&self) -> bool {
        self.volatiles.taunt_turns > 0
    }

    /// Confuse for `turns` turns unless already confused.
    pub fn confuse(&mut self, turns: u8) -> bool {
        if !self.is_alive() || self.is_confused() {
            return false;
        }
        self.volatiles.confusion_turns = turns.max(1);
        true
    }

    /// Taunt for `turns` turns unless already taunted.
    pub fn taunt(&mut self, turns: u8) -> bool {
        if !self.is_alive() || self.is_taunted() {
            return false;
        }
        self.volatiles.taunt_turns = turns.max(1);
        true
    }

    /// Reset stat stages and volatile conditions, as happens on switch-out.
    /// HP, PP and persistent status are kept.
    pub fn clear_battle_state(&mut self) {
        self.stages = [0; 6];
        self.volatiles = VolatileState::default();
    }

    // === Moves ===

    pub fn moves(&self) -> &[Option<MoveSlot>; MAX_MOVES] {
        &self.moves
    }

    pub fn move_slot(&self, index: usize) -> Option<&MoveSlot> {
        self.moves.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn move_slot_mut(&mut self, index: usize) -> Option<&mut MoveSlot> {
        self.moves.get_mut(index).and_then(|slot| slot.as_mut())
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().flatten().any(|slot| slot.pp > 0)
    }
}

impl fmt::Display for PokemonInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Lvl.{} | HP: {}/{}", self.surname, self.level, self.hp, self.max_hp())?;
        if self.status != StatusCondition::Healthy {
            write!(f, " | {}", self.status)?;
        }
        Ok(())
    }
}
