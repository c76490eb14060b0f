use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

/// Elemental type of a species or a move.
///
/// `TypeNone` is the sentinel carried by engine-internal moves (Struggle,
/// confusion self-hits) and is neutral against every defender.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ElementalType {
    #[strum(to_string = "TypeNone", serialize = "None")]
    TypeNone,
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
}

impl ElementalType {
    /// Dense index of this type, suitable for table lookups.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_indices_are_dense() {
        for (expected, element) in ElementalType::iter().enumerate() {
            assert_eq!(element.index(), expected);
        }
        assert_eq!(ElementalType::COUNT, 18);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(ElementalType::from_str("fire"), Ok(ElementalType::Fire));
        assert_eq!(ElementalType::from_str("None"), Ok(ElementalType::TypeNone));
        assert!(ElementalType::from_str("Fairy").is_err());
        assert_eq!(ElementalType::TypeNone.to_string(), "TypeNone");
    }
}
