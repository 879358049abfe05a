//! BaseStatsSource - Stats from race growth and level

use crate::catalog::GrowthTable;
use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator, StatBlock, StatTable};

/// Base stat block of a growth table at `level`.
///
/// Per stat `floor(level / every) * amount`. Fractional amounts are not
/// rounded. Level is not validated here.
pub fn base_stats(growth: &GrowthTable, level: u32) -> StatBlock {
    StatTable::from_fn(|stat| growth[stat].at_level(level))
}

/// Stats from race growth at the character's level
pub struct BaseStatsSource {
    stats: StatBlock,
}

impl BaseStatsSource {
    pub fn new(growth: &GrowthTable, level: u32) -> Self {
        BaseStatsSource {
            stats: base_stats(growth, level),
        }
    }
}

impl StatSource for BaseStatsSource {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn stage(&self) -> Stage {
        Stage::Base
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(&self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GrowthRule;
    use crate::types::{StatKind, MAX_LEVEL};

    fn human() -> GrowthTable {
        StatTable::from_fn(|_| GrowthRule::new(1.0, 2))
    }

    #[test]
    fn test_base_stats_level_scaling() {
        let stats = base_stats(&human(), 10);
        for stat in StatKind::all() {
            assert!((stats[*stat] - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_base_stats_level_zero() {
        assert!(base_stats(&human(), 0).is_zero());
    }

    #[test]
    fn test_base_stats_max_level() {
        let stats = base_stats(&human(), MAX_LEVEL);
        assert!((stats.speed - 152.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_amount_not_rounded() {
        let mut growth = human();
        growth.melee_resistance = GrowthRule::new(0.5, 2);
        let stats = base_stats(&growth, 7);
        assert!((stats.melee_resistance - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_stats_source() {
        let source = BaseStatsSource::new(&human(), 4);
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);
        assert!((acc.stats().hp_max - 2.0).abs() < f64::EPSILON);
        assert_eq!(source.priority(), -100);
    }
}
