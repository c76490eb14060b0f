//! Precomputed elemental effectiveness multipliers.
//!
//! The chart is written defender-first (what a type is weak to, resists and is
//! immune to) and expanded once into dense single- and dual-type tables.

use schema::ElementalType;
use std::sync::LazyLock;
use strum::{EnumCount, IntoEnumIterator};

const N: usize = ElementalType::COUNT;

struct DefenderRelations {
    defender: ElementalType,
    weaknesses: &'static [ElementalType],
    resistances: &'static [ElementalType],
    immunities: &'static [ElementalType],
}

macro_rules! relations {
    ($defender:ident, weak: [$($w:ident),*], resist: [$($r:ident),*], immune: [$($i:ident),*]) => {
        DefenderRelations {
            defender: ElementalType::$defender,
            weaknesses: &[$(ElementalType::$w),*],
            resistances: &[$(ElementalType::$r),*],
            immunities: &[$(ElementalType::$i),*],
        }
    };
}

#[rustfmt::skip]
const DEFENDER_TABLE: &[DefenderRelations] = &[
    relations!(Normal,   weak: [Fighting], resist: [], immune: [Ghost]),
    relations!(Fire,     weak: [Water, Ground, Rock], resist: [Grass, Fire, Steel, Ice, Bug], immune: []),
    relations!(Water,    weak: [Grass, Electric], resist: [Fire, Water, Ice, Steel], immune: []),
    relations!(Grass,    weak: [Fire, Ice, Poison, Flying, Bug], resist: [Water, Grass, Electric, Ground], immune: []),
    relations!(Electric, weak: [Ground], resist: [Electric, Flying, Steel], immune: []),
    relations!(Ice,      weak: [Fire, Fighting, Rock, Steel], resist: [Ice], immune: []),
    relations!(Fighting, weak: [Flying, Psychic], resist: [Bug, Rock, Dark], immune: []),
    relations!(Poison,   weak: [Ground, Psychic], resist: [Grass, Fighting, Poison, Bug], immune: []),
    relations!(Ground,   weak: [Water, Grass, Ice], resist: [Poison, Rock], immune: [Electric]),
    relations!(Flying,   weak: [Electric, Ice, Rock], resist: [Grass, Fighting, Bug], immune: [Ground]),
    relations!(Psychic,  weak: [Bug, Ghost, Dark], resist: [Fighting, Psychic], immune: []),
    relations!(Bug,      weak: [Fire, Flying, Rock], resist: [Grass, Fighting, Ground], immune: []),
    relations!(Rock,     weak: [Water, Grass, Fighting, Ground, Steel], resist: [Normal, Fire, Poison, Flying], immune: []),
    relations!(Ghost,    weak: [Ghost, Dark], resist: [Bug, Poison], immune: [Normal, Fighting]),
    relations!(Dragon,   weak: [Ice, Dragon], resist: [Fire, Water, Electric, Grass], immune: []),
    relations!(Dark,     weak: [Fighting, Bug], resist: [Ghost, Dark], immune: [Psychic]),
    relations!(Steel,    weak: [Fire, Fighting, Ground], resist: [Normal, Grass, Ice, Flying, Psychic, Bug, Rock, Ghost, Dragon, Dark, Steel], immune: [Poison]),
];

/// Dense effectiveness lookup tables, indexed by [`ElementalType::index`].
#[derive(Debug)]
pub struct TypeChart {
    single: [[f64; N]; N],
    dual: Box<[[[f64; N]; N]; N]>,
}

static TYPE_CHART: LazyLock<TypeChart> = LazyLock::new(TypeChart::build);

impl TypeChart {
    /// The shared chart, built on first use.
    pub fn global() -> &'static TypeChart {
        &TYPE_CHART
    }

    fn build() -> Self {
        let mut single = [[1.0; N]; N];
        for relations in DEFENDER_TABLE {
            let defender = relations.defender.index();
            for attacker in relations.weaknesses {
                single[attacker.index()][defender] = 2.0;
            }
            for attacker in relations.resistances {
                single[attacker.index()][defender] = 0.5;
            }
            for attacker in relations.immunities {
                single[attacker.index()][defender] = 0.0;
            }
        }

        let mut dual = Box::new([[[1.0; N]; N]; N]);
        for attacker in ElementalType::iter() {
            for first in ElementalType::iter() {
                for second in ElementalType::iter() {
                    let a = attacker.index();
                    // A mono-typed defender is stored as (t, t) and must not be squared.
                    let product = if first == second {
                        single[a][first.index()]
                    } else {
                        single[a][first.index()] * single[a][second.index()]
                    };
                    dual[a][first.index()][second.index()] = product;
                }
            }
        }

        Self { single, dual }
    }

    /// Multiplier of `attacker` against a single defending type.
    pub fn single(&self, attacker: ElementalType, defender: ElementalType) -> f64 {
        self.single[attacker.index()][defender.index()]
    }

    /// Multiplier of `attacker` against a defender typed `(first, second)`.
    /// Mono-typed defenders pass the same type twice.
    pub fn effectiveness(&self, attacker: ElementalType, defender: (ElementalType, ElementalType)) -> f64 {
        self.dual[attacker.index()][defender.0.index()][defender.1.index()]
    }
}

/// Shorthand for `TypeChart::global().effectiveness(..)`.
pub fn effectiveness(attacker: ElementalType, defender: (ElementalType, ElementalType)) -> f64 {
    TypeChart::global().effectiveness(attacker, defender)
}
