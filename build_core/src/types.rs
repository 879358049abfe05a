//! Core types shared by every part of the calculator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level a character can reach
pub const MAX_LEVEL: u32 = 305;

/// Number of modifier (capsule) slots
pub const MODIFIER_SLOTS: usize = 4;

/// Number of move slots
pub const MOVE_SLOTS: usize = 10;

/// One of the seven derived attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    HpMax,
    KiMax,
    MeleeDamage,
    KiDamage,
    MeleeResistance,
    KiResistance,
    Speed,
}

impl StatKind {
    /// All stats in display order
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::HpMax,
            StatKind::KiMax,
            StatKind::MeleeDamage,
            StatKind::KiDamage,
            StatKind::MeleeResistance,
            StatKind::KiResistance,
            StatKind::Speed,
        ]
    }

    /// Wire name used in share codes and catalog files
    pub fn key(&self) -> &'static str {
        match self {
            StatKind::HpMax => "hpMax",
            StatKind::KiMax => "kiMax",
            StatKind::MeleeDamage => "meleeDamage",
            StatKind::KiDamage => "kiDamage",
            StatKind::MeleeResistance => "meleeResistance",
            StatKind::KiResistance => "kiResistance",
            StatKind::Speed => "speed",
        }
    }

    /// Parse a wire name, `None` for anything unknown
    pub fn from_key(key: &str) -> Option<StatKind> {
        StatKind::all().iter().copied().find(|s| s.key() == key)
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            StatKind::HpMax => "HP Max",
            StatKind::KiMax => "Ki Max",
            StatKind::MeleeDamage => "Melee Damage",
            StatKind::KiDamage => "Ki Damage",
            StatKind::MeleeResistance => "Melee Resistance",
            StatKind::KiResistance => "Ki Resistance",
            StatKind::Speed => "Speed",
        }
    }

    /// Pools are excluded from the possession bonus
    pub fn is_pool(&self) -> bool {
        matches!(self, StatKind::HpMax | StatKind::KiMax)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a form contributes to a stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Added to the running value
    #[default]
    Flat,
    /// Multiplies the running value, then floors
    Multiplier,
}

/// Mastery level of an active form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    #[default]
    Normal,
    Mastered,
    Perfected,
}

impl MasteryTier {
    pub fn all() -> &'static [MasteryTier] {
        &[MasteryTier::Normal, MasteryTier::Mastered, MasteryTier::Perfected]
    }

    /// Single-character code stored in share codes
    pub fn code(&self) -> &'static str {
        match self {
            MasteryTier::Normal => "0",
            MasteryTier::Mastered => "1",
            MasteryTier::Perfected => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<MasteryTier> {
        match code {
            "0" => Some(MasteryTier::Normal),
            "1" => Some(MasteryTier::Mastered),
            "2" => Some(MasteryTier::Perfected),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MasteryTier::Normal => "Normal",
            MasteryTier::Mastered => "Mastered",
            MasteryTier::Perfected => "Perfected",
        }
    }
}

/// Per-tier scaling for flat form bonuses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasteryMultipliers {
    pub normal: f64,
    pub mastered: f64,
    pub perfected: f64,
}

impl Default for MasteryMultipliers {
    fn default() -> Self {
        MasteryMultipliers {
            normal: 1.0,
            mastered: 1.25,
            perfected: 1.5,
        }
    }
}

impl MasteryMultipliers {
    pub fn for_tier(&self, tier: MasteryTier) -> f64 {
        match tier {
            MasteryTier::Normal => self.normal,
            MasteryTier::Mastered => self.mastered,
            MasteryTier::Perfected => self.perfected,
        }
    }
}

/// Race-gated mechanic that injects a second character's stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceMechanic {
    Absorption,
    Possession,
}

/// Clamp a raw level into `[0, MAX_LEVEL]`
pub fn clamp_level(raw: i64) -> u32 {
    raw.clamp(0, MAX_LEVEL as i64) as u32
}

/// Integer at the start of `input`, after leading whitespace and an optional
/// sign. Trailing text is ignored, overflow saturates and text without
/// leading digits is 0.
pub fn parse_leading_int(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(digit - b'0');
        value = value.saturating_mul(10);
        value = if negative { value.saturating_sub(d) } else { value.saturating_add(d) };
    }
    value
}

/// Parse level text input, clamped to `[0, MAX_LEVEL]`
pub fn parse_level(input: &str) -> u32 {
    clamp_level(parse_leading_int(input))
}
