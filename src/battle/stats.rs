use crate::pokemon::PokemonInst;
use schema::{MoveCategory, StatType};

pub const STAGE_MIN: i8 = -6;
pub const STAGE_MAX: i8 = 6;

/// Multipliers for stages -6..=+6 of the five battle stats.
pub const STAGE_MULTIPLIERS: [f64; 13] = [
    0.25, 0.29, 0.33, 0.40, 0.50, 0.67, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0,
];

/// Multipliers for accuracy stages -6..=+6.
pub const ACCURACY_MULTIPLIERS: [f64; 13] = [
    0.33, 0.38, 0.43, 0.5, 0.6, 0.75, 1.0, 1.33, 1.67, 2.0, 2.33, 2.67, 3.0,
];

pub fn clamp_stage(stage: i16) -> i8 {
    stage.clamp(i16::from(STAGE_MIN), i16::from(STAGE_MAX)) as i8
}

fn stage_index(stage: i8) -> usize {
    (stage.clamp(STAGE_MIN, STAGE_MAX) - STAGE_MIN) as usize
}

/// Apply stat stage multipliers. The result is floored.
pub fn apply_stat_stage_multiplier(raw_stat: u16, stage: i8) -> u16 {
    (f64::from(raw_stat) * STAGE_MULTIPLIERS[stage_index(stage)]) as u16
}

pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    ACCURACY_MULTIPLIERS[stage_index(stage)]
}

/// Attack stat used by a move of `category`: Atk for physical, SpA for special.
/// Status moves don't use attack stats.
pub fn effective_attack(pokemon: &PokemonInst, category: MoveCategory) -> u16 {
    match category {
        MoveCategory::Physical => pokemon.stat(StatType::Atk),
        MoveCategory::Special => pokemon.stat(StatType::SpAtk),
        MoveCategory::Status => 0,
    }
}

/// Defense stat hit by a move of `category`: Def for physical, SpD for special.
pub fn effective_defense(pokemon: &PokemonInst, category: MoveCategory) -> u16 {
    match category {
        MoveCategory::Physical => pokemon.stat(StatType::Def),
        MoveCategory::Special => pokemon.stat(StatType::SpDef),
        MoveCategory::Status => 0,
    }
}

pub fn effective_speed(pokemon: &PokemonInst) -> u16 {
    pokemon.stat(StatType::Spe)
}

/// Probability (0.0..=1.0) that a move of base `accuracy` hits for a user at
/// `accuracy_stage`. A uniform draw below it hits.
pub fn hit_threshold(accuracy: u8, accuracy_stage: i8) -> f64 {
    let threshold = f64::from(accuracy) / 100.0 * accuracy_stage_multiplier(accuracy_stage);
    threshold.min(1.0)
}
