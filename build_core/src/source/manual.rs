//! ManualSource - Level-budgeted stat points spent by the player

use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator, StatBlock};
use crate::types::{parse_leading_int, StatKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Manually allocated stat points.
///
/// Every edit goes through the clamp policy so the total spent never exceeds
/// the level budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualAllocation {
    points: StatBlock,
}

impl ManualAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current allocation
    pub fn stats(&self) -> &StatBlock {
        &self.points
    }

    pub fn get(&self, stat: StatKind) -> f64 {
        self.points[stat]
    }

    /// Total points spent
    pub fn spent(&self) -> f64 {
        self.points.sum()
    }

    /// `level - spent`
    pub fn free_points(&self, level: u32) -> f64 {
        level as f64 - self.spent()
    }

    /// Propose `value` for `stat` and return the value actually stored.
    ///
    /// Negative input becomes 0. If the other stats plus `value` exceed
    /// `level`, the stat receives whatever budget is left.
    pub fn set(&mut self, stat: StatKind, value: i64, level: u32) -> u32 {
        let value = value.max(0);
        let others = self.spent() - self.points[stat];
        let accepted = if others + value as f64 > level as f64 {
            (level as f64 - others).max(0.0)
        } else {
            value as f64
        };
        if accepted != value as f64 {
            debug!(stat = stat.key(), requested = value, accepted, "manual points clamped");
        }
        self.points[stat] = accepted;
        accepted as u32
    }

    /// Same as [`set`](Self::set) for raw text input, read with
    /// [`parse_leading_int`]
    pub fn set_from_input(&mut self, stat: StatKind, input: &str, level: u32) -> u32 {
        let value = parse_leading_int(input);
        self.set(stat, value, level)
    }

    /// Put every free point into `stat`
    pub fn quick_max(&mut self, stat: StatKind, level: u32) -> u32 {
        self.set(stat, level as i64, level)
    }

    /// Shrink the allocation to fit `level`, e.g. after the level drops.
    /// Stats earlier in `StatKind` order keep their points first.
    pub fn clamp_to_level(&mut self, level: u32) {
        let mut remaining = level as f64;
        for stat in StatKind::all() {
            let kept = self.points[*stat].min(remaining).max(0.0);
            self.points[*stat] = kept;
            remaining -= kept;
        }
    }

    pub fn reset(&mut self) {
        self.points = StatBlock::zero();
    }
}

/// Stats from manual allocation
pub struct ManualSource {
    points: StatBlock,
}

impl ManualSource {
    pub fn new(points: StatBlock) -> Self {
        ManualSource { points }
    }
}

impl StatSource for ManualSource {
    fn id(&self) -> &str {
        "manual"
    }

    fn stage(&self) -> Stage {
        Stage::Manual
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(&self.points);
    }
}
