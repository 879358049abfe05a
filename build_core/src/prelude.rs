//! Prelude module for convenient imports
//!
//! ```rust
//! use build_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::{Stage, StatBlock, StatBreakdown};
pub use crate::types::{clamp_level, parse_leading_int, parse_level, BonusType, MasteryTier, RaceMechanic, StatKind, MAX_LEVEL};

// Catalog
pub use crate::catalog::{Catalog, Form, Modifier, ModifierCategory, Move, MoveCategory, NpcPreset, Race};

// Builds
pub use crate::build::{Build, BuildSelections};
pub use crate::source::{AbsorptionState, FormStack, ManualAllocation, PossessionState};

// Share codes
pub use crate::share::{code_from_input, decode, decode_or_default, encode, share_url, ShareError};

// Config
pub use crate::config::ConfigError;
