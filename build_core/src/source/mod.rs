//! StatSource - Trait and implementations for stat providers

mod absorption;
mod base_stats;
mod form;
mod manual;
mod modifier;
mod possession;

pub use absorption::{absorption_stats, AbsorptionSource, AbsorptionState};
pub use base_stats::{base_stats, BaseStatsSource};
pub use form::{form_bonus, ActiveForm, FormSource, FormStack};
pub use manual::{ManualAllocation, ManualSource};
pub use modifier::ModifierSource;
pub use possession::{possession_stats, PossessionSource, PossessionState, POSSESSION_RATE};

use crate::stat_block::{Stage, StatAccumulator};

/// Trait for anything that contributes stats to a build
pub trait StatSource: Send + Sync {
    /// Label listed against the source's stage in the breakdown
    fn id(&self) -> &str;

    /// Pipeline stage this source belongs to
    fn stage(&self) -> Stage;

    /// Priority within the pipeline (higher = applied later).
    /// Defaults to the stage priority; sources with equal priority run in
    /// the order they were supplied.
    fn priority(&self) -> i32 {
        self.stage().priority()
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
