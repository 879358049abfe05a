//! build_core - Character build stat calculator
//!
//! This library provides:
//! - Catalog: Races, forms, modifiers, moves and NPC presets loaded from TOML
//! - StatSource: One provider per pipeline stage (base, manual, forms, ...)
//! - Build: Selections resolved against a catalog, with final stats and a
//!   per-stage breakdown
//! - Share codes: Compact base64 form of a build for links

pub mod build;
pub mod catalog;
pub mod config;
pub mod prelude;
pub mod share;
pub mod source;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use build::{final_stats, free_points, Build, BuildSelections, ModifierLoadout, MoveLoadout};
pub use catalog::{Catalog, Form, Modifier, ModifierBonus, Move, NpcPreset, Race, Subrace};
pub use config::ConfigError;
pub use share::{decode, decode_or_default, encode, share_url, ShareError};
pub use source::{
    form_bonus, AbsorptionState, ActiveForm, FormStack, ManualAllocation, PossessionState, StatSource,
};
pub use stat_block::{Stage, StatAccumulator, StatBlock, StatBreakdown, StatTable};
pub use types::{BonusType, MasteryTier, RaceMechanic, StatKind, MAX_LEVEL};
