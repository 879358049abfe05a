//! BuildSelections - Everything the user picked, edited through policy methods

use crate::build::{Build, ModifierLoadout, MoveLoadout};
use crate::catalog::{Catalog, Form, Move, Race};
use crate::source::{AbsorptionState, ActiveForm, FormStack, ManualAllocation, PossessionState};
use crate::types::{clamp_level, parse_level, MasteryTier, RaceMechanic, StatKind};
use tracing::{debug, warn};

/// User input state of one build.
///
/// Race, subrace, level, manual points and forms go through methods that
/// keep them consistent with each other and with the catalog: spent points
/// never exceed the level and only one non-stackable form is active. A
/// possessing race takes its forms from the possessed body.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSelections {
    race: String,
    subrace: Option<String>,
    level: u32,
    manual: ManualAllocation,
    forms: FormStack,
    pub absorption: AbsorptionState,
    possession: PossessionState,
    pub modifiers: ModifierLoadout,
    pub moves: MoveLoadout,
}

impl BuildSelections {
    /// Defaults for `catalog`: first race, level 1, nothing else selected
    pub fn new(catalog: &Catalog) -> Self {
        let race = catalog.default_race();
        BuildSelections {
            race: race.map(|r| r.name.clone()).unwrap_or_default(),
            subrace: race.and_then(default_subrace),
            level: 1,
            manual: ManualAllocation::new(),
            forms: FormStack::new(),
            absorption: AbsorptionState::None,
            possession: PossessionState::None,
            modifiers: ModifierLoadout::new(),
            moves: MoveLoadout::new(),
        }
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn subrace(&self) -> Option<&str> {
        self.subrace.as_deref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn manual(&self) -> &ManualAllocation {
        &self.manual
    }

    pub fn forms(&self) -> &FormStack {
        &self.forms
    }

    pub fn possession(&self) -> &PossessionState {
        &self.possession
    }

    /// `level - spent`
    pub fn free_points(&self) -> f64 {
        self.manual.free_points(self.level)
    }

    /// Catalog entry of the selected race
    pub fn race_in<'a>(&self, catalog: &'a Catalog) -> Option<&'a Race> {
        catalog.race(&self.race)
    }

    /// Switch race. Clears forms and the race mechanics, selects the default
    /// subrace and unequips moves the new race cannot use. Unknown names are
    /// ignored.
    pub fn select_race(&mut self, name: &str, catalog: &Catalog) -> bool {
        let Some(race) = catalog.race(name) else {
            warn!(race = %name, "unknown race");
            return false;
        };
        if race.name != self.race {
            debug!(from = %self.race, to = %race.name, "race changed");
        }
        self.race = race.name.clone();
        self.subrace = default_subrace(race);
        self.forms.clear();
        self.absorption = AbsorptionState::None;
        self.possession = PossessionState::None;
        self.prune_moves(catalog);
        true
    }

    /// Switch subrace of the current race. Forms and moves the new subrace
    /// cannot use are dropped.
    pub fn select_subrace(&mut self, name: &str, catalog: &Catalog) -> bool {
        let Some(subrace) = self.race_in(catalog).and_then(|r| r.subrace(name)) else {
            warn!(race = %self.race, subrace = %name, "unknown subrace");
            return false;
        };
        self.subrace = Some(subrace.name.clone());
        if let Some((_, resolved)) = self.form_race(catalog) {
            self.forms.retain(|active| active.form.available_to(resolved));
        }
        self.prune_moves(catalog);
        true
    }

    /// Set who a possessing race inhabits. Targets outside
    /// [`Catalog::possession_targets`] are rejected. Forms are cleared when
    /// the possessed race or subrace changes.
    pub fn set_possession(&mut self, state: PossessionState, catalog: &Catalog) -> bool {
        if let PossessionState::Target { race, .. } = &state {
            if !catalog.possession_targets().any(|r| &r.name == race) {
                warn!(target = %race, "race cannot be possessed");
                return false;
            }
        }
        let before = self.form_source(catalog);
        self.possession = state;
        if self.form_source(catalog) != before {
            debug!(race = %self.race, "possessed body changed");
            self.forms.clear();
        }
        true
    }

    /// Race and resolved subrace whose forms this build may use: the
    /// possessed body while possessing, otherwise the build's own race
    pub fn form_race<'a>(&self, catalog: &'a Catalog) -> Option<(&'a Race, Option<&'a str>)> {
        let own = self.race_in(catalog)?;
        let (race, requested) = match &self.possession {
            PossessionState::Target { race, subrace, .. } if own.has_mechanic(RaceMechanic::Possession) => {
                match catalog.race(race) {
                    Some(target) => (target, subrace.as_deref()),
                    None => (own, self.subrace.as_deref()),
                }
            }
            _ => (own, self.subrace.as_deref()),
        };
        let resolved = race.resolve_subrace(requested).map(|s| s.name.as_str());
        Some((race, resolved))
    }

    /// Forms selectable right now, with their index in [`Self::form_race`]
    pub fn available_forms<'a>(&self, catalog: &'a Catalog) -> Vec<(usize, &'a Form)> {
        match self.form_race(catalog) {
            Some((race, subrace)) => race.available_forms(subrace).collect(),
            None => Vec::new(),
        }
    }

    /// Set the level, clamped to `[0, 305]`. Manual points are trimmed to
    /// the new budget.
    pub fn set_level(&mut self, level: i64) -> u32 {
        self.level = clamp_level(level);
        self.manual.clamp_to_level(self.level);
        self.level
    }

    /// Level from text input, read with [`crate::types::parse_leading_int`]
    pub fn set_level_from_input(&mut self, input: &str) -> u32 {
        self.set_level(parse_level(input) as i64)
    }

    /// Propose manual points for `stat`; see [`ManualAllocation::set`]
    pub fn set_manual(&mut self, stat: StatKind, value: i64) -> u32 {
        self.manual.set(stat, value, self.level)
    }

    pub fn set_manual_from_input(&mut self, stat: StatKind, input: &str) -> u32 {
        self.manual.set_from_input(stat, input, self.level)
    }

    /// Put every free point into `stat`
    pub fn quick_max(&mut self, stat: StatKind) -> u32 {
        self.manual.quick_max(stat, self.level)
    }

    /// Toggle the form at `index` of [`Self::form_race`]. Forms the current
    /// subrace cannot use are rejected.
    pub fn toggle_form(&mut self, index: usize, tier: MasteryTier, catalog: &Catalog) -> bool {
        let Some(form) = self.usable_form(index, catalog) else {
            return false;
        };
        self.forms.toggle(form, tier);
        true
    }

    /// Activate the race's form at `index` without toggling it off when
    /// already active
    pub fn activate_form(&mut self, index: usize, tier: MasteryTier, catalog: &Catalog) -> bool {
        let Some(form) = self.usable_form(index, catalog) else {
            return false;
        };
        self.forms.push(ActiveForm::new(form.clone(), tier));
        true
    }

    pub fn clear_forms(&mut self) {
        self.forms.clear();
    }

    /// Equip catalog modifier `index` in `slot`, or empty the slot
    pub fn equip_modifier(&mut self, slot: usize, index: Option<usize>, catalog: &Catalog) -> bool {
        if let Some(i) = index {
            if catalog.modifier(i).is_none() {
                warn!(index = i, "no such modifier");
                return false;
            }
        }
        self.modifiers.set(slot, index)
    }

    /// Equip catalog move `index` in `slot`, or empty the slot. Moves the
    /// race cannot use are rejected.
    pub fn equip_move(&mut self, slot: usize, index: Option<usize>, catalog: &Catalog) -> bool {
        if let Some(i) = index {
            let Some(mv) = catalog.move_at(i) else {
                warn!(index = i, "no such move");
                return false;
            };
            if !self.can_use_move(mv, catalog) {
                debug!(mv = %mv.name, race = %self.race, "move not available to race");
                return false;
            }
        }
        self.moves.set(slot, index)
    }

    /// Back to level 1 with nothing allocated, active or equipped. The race,
    /// subrace and race mechanics are kept.
    pub fn reset(&mut self) {
        self.level = 1;
        self.manual.reset();
        self.forms.clear();
        self.modifiers.reset();
        self.moves.reset();
    }

    /// Resolve against `catalog` into a computable build
    pub fn compose(&self, catalog: &Catalog) -> Build {
        Build::compose(self, catalog)
    }

    fn form_source(&self, catalog: &Catalog) -> Option<(String, Option<String>)> {
        self.form_race(catalog)
            .map(|(race, subrace)| (race.name.clone(), subrace.map(str::to_string)))
    }

    fn usable_form<'a>(&self, index: usize, catalog: &'a Catalog) -> Option<&'a Form> {
        let (race, resolved) = self.form_race(catalog)?;
        let form = race.form(index)?;
        if !form.available_to(resolved) {
            debug!(form = %form.name, "form not available to subrace");
            return None;
        }
        Some(form)
    }

    fn prune_moves(&mut self, catalog: &Catalog) {
        let unusable: Vec<usize> = self
            .moves
            .equipped()
            .filter(|(_, index)| {
                catalog
                    .move_at(*index)
                    .map_or(true, |mv| !self.can_use_move(mv, catalog))
            })
            .map(|(slot, _)| slot)
            .collect();
        for slot in unusable {
            self.moves.clear(slot);
        }
    }

    fn can_use_move(&self, mv: &Move, catalog: &Catalog) -> bool {
        let subrace = self
            .race_in(catalog)
            .and_then(|r| r.resolve_subrace(self.subrace.as_deref()))
            .map(|s| s.name.as_str());
        mv.is_available_to(&self.race, subrace)
    }
}

fn default_subrace(race: &Race) -> Option<String> {
    race.subraces.first().map(|s| s.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GrowthRule, Modifier, ModifierCategory, MoveCategory, Subrace};
    use crate::stat_block::StatTable;
    use crate::types::{BonusType, RaceMechanic};

    fn race(name: &str, code: &str) -> Race {
        Race {
            name: name.to_string(),
            code: code.to_string(),
            growth: StatTable::from_fn(|_| GrowthRule::new(1.0, 2)),
            forms: vec![
                Form::new("Kaioken", BonusType::Multiplier).with_bonus(StatKind::MeleeDamage, 2.0),
                Form::new("Mystic", BonusType::Flat).with_bonus(StatKind::MeleeDamage, 130.0),
            ],
            subraces: Vec::new(),
            mechanic: None,
        }
    }

    fn catalog() -> Catalog {
        let mut alien = race("Alien", "AL");
        let mut giant = Form::new("Gigantification", BonusType::Flat).with_bonus(StatKind::HpMax, 200.0);
        giant.subrace = Some("Yardratian".to_string());
        alien.forms.push(giant);
        alien.subraces = vec![
            Subrace { name: "Generic".to_string(), growth: alien.growth },
            Subrace { name: "Yardratian".to_string(), growth: alien.growth },
        ];
        let mut majin = race("Majin", "M");
        majin.mechanic = Some(RaceMechanic::Absorption);
        let mut tuffle = race("Tuffle", "T");
        tuffle.forms.clear();
        tuffle.mechanic = Some(RaceMechanic::Possession);

        Catalog {
            races: vec![race("Human", "H"), alien, majin, tuffle],
            modifiers: vec![Modifier::new("Garden Capsule", ModifierCategory::Active)],
            moves: vec![
                Move { name: "Kamehameha".to_string(), category: MoveCategory::Ki, allowed_races: None },
                Move {
                    name: "Instant Transmission".to_string(),
                    category: MoveCategory::RaceExclusive,
                    allowed_races: Some(vec!["Alien:Yardratian".to_string()]),
                },
            ],
            npcs: Vec::new(),
        }
    }

    #[test]
    fn test_defaults() {
        let sel = BuildSelections::new(&catalog());
        assert_eq!(sel.race(), "Human");
        assert_eq!(sel.level(), 1);
        assert_eq!(sel.subrace(), None);
        assert!(sel.forms().is_empty());
        assert!(sel.modifiers.is_empty());
    }

    #[test]
    fn test_select_race_resets_race_state() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Majin", &catalog);
        sel.absorption = AbsorptionState::ClonedLevel { level: 30 };
        sel.toggle_form(1, MasteryTier::Normal, &catalog);

        assert!(sel.select_race("Alien", &catalog));
        assert_eq!(sel.subrace(), Some("Generic"));
        assert!(sel.forms().is_empty());
        assert_eq!(sel.absorption, AbsorptionState::None);
        assert!(!sel.select_race("Namek", &catalog));
        assert_eq!(sel.race(), "Alien");
    }

    #[test]
    fn test_subrace_restricted_form() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Alien", &catalog);
        assert!(!sel.toggle_form(2, MasteryTier::Normal, &catalog));

        sel.select_subrace("Yardratian", &catalog);
        assert!(sel.toggle_form(2, MasteryTier::Normal, &catalog));

        sel.select_subrace("Generic", &catalog);
        assert!(sel.forms().is_empty());
    }

    #[test]
    fn test_possessed_body_supplies_forms() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Tuffle", &catalog);
        assert!(sel.available_forms(&catalog).is_empty());
        assert!(!sel.toggle_form(0, MasteryTier::Normal, &catalog));

        let mut body = PossessionState::target("Alien");
        if let PossessionState::Target { subrace, .. } = &mut body {
            *subrace = Some("Yardratian".to_string());
        }
        assert!(sel.set_possession(body, &catalog));
        assert_eq!(sel.available_forms(&catalog).len(), 3);
        assert!(sel.toggle_form(2, MasteryTier::Normal, &catalog));
        assert_eq!(sel.forms().len(), 1);

        assert!(sel.set_possession(PossessionState::target("Human"), &catalog));
        assert!(sel.forms().is_empty());
        assert!(!sel.toggle_form(2, MasteryTier::Normal, &catalog));
    }

    #[test]
    fn test_mechanic_races_cannot_be_possessed() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Tuffle", &catalog);
        assert!(!sel.set_possession(PossessionState::target("Majin"), &catalog));
        assert!(!sel.set_possession(PossessionState::target("Tuffle"), &catalog));
        assert!(!sel.set_possession(PossessionState::target("Namek"), &catalog));
        assert_eq!(sel.possession(), &PossessionState::None);
    }

    #[test]
    fn test_possession_ignored_without_mechanic() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        assert!(sel.set_possession(PossessionState::target("Alien"), &catalog));
        assert_eq!(sel.available_forms(&catalog).len(), 2);
        assert_eq!(sel.form_race(&catalog).map(|(r, _)| r.name.as_str()), Some("Human"));
    }

    #[test]
    fn test_lowering_level_trims_manual() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(10);
        sel.set_manual(StatKind::Speed, 10);
        assert_eq!(sel.set_level(4), 4);
        assert!((sel.manual().spent() - 4.0).abs() < f64::EPSILON);
        assert_eq!(sel.set_level(1000), 305);
        assert_eq!(sel.set_level_from_input("abc"), 0);
    }

    #[test]
    fn test_equip_checks_catalog_and_eligibility() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        assert!(sel.equip_modifier(0, Some(0), &catalog));
        assert!(!sel.equip_modifier(1, Some(99), &catalog));
        assert!(sel.equip_move(0, Some(0), &catalog));
        assert!(!sel.equip_move(1, Some(1), &catalog));

        sel.select_race("Alien", &catalog);
        sel.select_subrace("Yardratian", &catalog);
        assert!(sel.equip_move(1, Some(1), &catalog));

        sel.select_subrace("Generic", &catalog);
        assert_eq!(sel.moves.get(1), None);
        assert_eq!(sel.moves.get(0), Some(0));
    }

    #[test]
    fn test_reset_keeps_race() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Alien", &catalog);
        sel.select_subrace("Yardratian", &catalog);
        sel.set_level(50);
        sel.set_manual(StatKind::HpMax, 20);
        sel.toggle_form(0, MasteryTier::Mastered, &catalog);
        sel.equip_modifier(3, Some(0), &catalog);

        sel.reset();
        assert_eq!(sel.race(), "Alien");
        assert_eq!(sel.subrace(), Some("Yardratian"));
        assert_eq!(sel.level(), 1);
        assert!(sel.manual().stats().is_zero());
        assert!(sel.forms().is_empty());
        assert!(sel.modifiers.is_empty());
    }
}
