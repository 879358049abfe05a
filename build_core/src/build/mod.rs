//! Build - A fully resolved character build and its stat pipeline

mod loadout;
mod selections;

pub use loadout::{Loadout, ModifierLoadout, MoveLoadout};
pub use selections::BuildSelections;

use crate::catalog::{Catalog, GrowthRule, Modifier, Race};
use crate::source::{
    absorption_stats, possession_stats, AbsorptionSource, ActiveForm, BaseStatsSource, FormSource, ManualSource,
    ModifierSource, PossessionSource, StatSource,
};
use crate::stat_block::{StatAccumulator, StatBlock, StatBreakdown, StatTable};
use crate::types::MODIFIER_SLOTS;
use tracing::{debug, warn};

/// Everything the stat pipeline needs, resolved against a catalog.
///
/// A `Build` is a plain value: computing stats never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    /// Selected race with the growth table of its subrace swapped in
    pub race: Race,
    pub subrace: Option<String>,
    pub level: u32,
    pub manual_stats: StatBlock,
    /// Active forms in activation order
    pub active_forms: Vec<ActiveForm>,
    pub absorption_stats: StatBlock,
    pub possession_stats: StatBlock,
    pub modifiers: [Option<Modifier>; MODIFIER_SLOTS],
}

impl Build {
    /// Resolve `selections` against `catalog`.
    ///
    /// An unknown race falls back to the catalog's first race. Race-gated
    /// mechanics are evaluated here so the pipeline only adds blocks.
    pub fn compose(selections: &BuildSelections, catalog: &Catalog) -> Build {
        let race = match catalog.race(selections.race()).or_else(|| catalog.default_race()) {
            Some(race) => race,
            None => {
                warn!(race = %selections.race(), "catalog has no races, using an empty growth table");
                return Build::inert(selections);
            }
        };
        let subrace = race
            .resolve_subrace(selections.subrace())
            .map(|s| s.name.clone());
        let resolved = race.resolve(subrace.as_deref());
        let level = selections.level();

        let absorption = absorption_stats(&resolved, &selections.absorption, catalog);
        let possession = possession_stats(&resolved, level, selections.possession(), catalog);
        let modifiers = std::array::from_fn(|slot| {
            selections
                .modifiers
                .get(slot)
                .and_then(|index| catalog.modifier(index))
                .cloned()
        });

        debug!(
            race = %resolved.name,
            subrace = ?subrace,
            level,
            forms = selections.forms().len(),
            "build composed"
        );

        Build {
            race: resolved,
            subrace,
            level,
            manual_stats: *selections.manual().stats(),
            active_forms: selections.forms().as_slice().to_vec(),
            absorption_stats: absorption,
            possession_stats: possession,
            modifiers,
        }
    }

    fn inert(selections: &BuildSelections) -> Build {
        Build {
            race: Race {
                name: selections.race().to_string(),
                code: String::new(),
                growth: StatTable::from_fn(|_| GrowthRule::new(0.0, 1)),
                forms: Vec::new(),
                subraces: Vec::new(),
                mechanic: None,
            },
            subrace: None,
            level: selections.level(),
            manual_stats: *selections.manual().stats(),
            active_forms: Vec::new(),
            absorption_stats: StatBlock::zero(),
            possession_stats: StatBlock::zero(),
            modifiers: Default::default(),
        }
    }

    /// Base stats of the resolved race at the build's level
    pub fn base_stats(&self) -> StatBlock {
        self.race.base_stats(self.level)
    }

    /// One stat source per pipeline input, in the order they were selected
    pub fn sources(&self) -> Vec<Box<dyn StatSource + '_>> {
        let mut sources: Vec<Box<dyn StatSource + '_>> = vec![
            Box::new(BaseStatsSource::new(&self.race.growth, self.level)),
            Box::new(ManualSource::new(self.manual_stats)),
        ];
        for active in &self.active_forms {
            sources.push(Box::new(FormSource::new(active)));
        }
        sources.push(Box::new(AbsorptionSource::new(self.absorption_stats)));
        sources.push(Box::new(PossessionSource::new(self.possession_stats)));
        for modifier in self.modifiers.iter().flatten() {
            sources.push(Box::new(ModifierSource::new(modifier)));
        }
        sources
    }

    /// Stat block after every stage, plus each form step
    pub fn breakdown(&self) -> StatBreakdown {
        StatAccumulator::run(&self.sources())
    }

    pub fn final_stats(&self) -> StatBlock {
        self.breakdown().final_stats()
    }

    /// `level - sum(manual_stats)`
    pub fn free_points(&self) -> f64 {
        self.level as f64 - self.manual_stats.sum()
    }
}

/// Final stats of `build`
pub fn final_stats(build: &Build) -> StatBlock {
    build.final_stats()
}

/// Unspent manual points of `build`
pub fn free_points(build: &Build) -> f64 {
    build.free_points()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Form, ModifierBonus, ModifierCategory};
    use crate::stat_block::Stage;
    use crate::types::{BonusType, MasteryTier, StatKind};

    fn human() -> Race {
        Race {
            name: "Human".to_string(),
            code: "H".to_string(),
            growth: StatTable::from_fn(|_| GrowthRule::new(1.0, 2)),
            forms: vec![
                Form::new("Kaioken", BonusType::Multiplier).with_bonus(StatKind::MeleeDamage, 2.0),
                Form::new("Max Power", BonusType::Flat)
                    .stackable()
                    .with_bonus(StatKind::MeleeDamage, 10.0),
            ],
            subraces: Vec::new(),
            mechanic: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            races: vec![human()],
            modifiers: vec![
                Modifier::new("Power Capsule", ModifierCategory::Passive)
                    .with_bonus(StatKind::MeleeDamage, ModifierBonus::percent(0.5)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_build_is_base_stats() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(10);
        let build = sel.compose(&catalog);
        assert_eq!(build.final_stats(), StatBlock::splat(5.0));
        assert!((build.free_points() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stages_apply_in_order() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(10);
        sel.set_manual(StatKind::MeleeDamage, 3);
        sel.toggle_form(1, MasteryTier::Normal, &catalog);
        sel.toggle_form(0, MasteryTier::Normal, &catalog);
        sel.equip_modifier(2, Some(0), &catalog);

        let breakdown = sel.compose(&catalog).breakdown();
        let melee = |stage| breakdown.after(stage).map(|s| s.melee_damage);
        assert_eq!(melee(Stage::Base), Some(5.0));
        assert_eq!(melee(Stage::Manual), Some(8.0));
        // (8 + 10) * 2
        assert_eq!(melee(Stage::Forms), Some(36.0));
        // floor(36 * 1.5)
        assert_eq!(melee(Stage::Modifiers), Some(54.0));
        assert_eq!(breakdown.form_steps.len(), 2);
        assert_eq!(breakdown.form_steps[0].form, "Max Power");

        let applied = |stage| {
            breakdown
                .stages
                .iter()
                .find(|s| s.stage == stage)
                .map(|s| s.sources.clone())
                .unwrap_or_default()
        };
        assert_eq!(applied(Stage::Base), vec!["base_stats"]);
        assert_eq!(applied(Stage::Forms), vec!["Max Power", "Kaioken"]);
        assert_eq!(applied(Stage::Modifiers), vec!["Power Capsule"]);
    }

    #[test]
    fn test_unknown_race_falls_back_to_default() {
        let catalog = catalog();
        let sel = BuildSelections::new(&Catalog {
            races: vec![Race {
                name: "Ghost".to_string(),
                ..human()
            }],
            ..Default::default()
        });
        assert_eq!(sel.compose(&catalog).race.name, "Human");
    }

    #[test]
    fn test_empty_catalog_composes_zero_build() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(40);
        let build = sel.compose(&Catalog::default());
        assert!(build.final_stats().is_zero());
        assert!((free_points(&build) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_composing_does_not_mutate() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(20);
        let build = sel.compose(&catalog);
        let first = final_stats(&build);
        assert_eq!(first, final_stats(&build));
        assert_eq!(build, sel.compose(&catalog));
    }
}
