//! Application state

use build_core::prelude::*;
use build_core::types::{MODIFIER_SLOTS, MOVE_SLOTS};
use tracing::{info, warn};

/// Link prefix used when no `BUILD_SHARE_URL` is configured
pub const DEFAULT_SHARE_BASE: &str = "http://localhost:3000/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Build,
    Forms,
    Loadout,
    Breakdown,
    Mechanics,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Build, Tab::Forms, Tab::Loadout, Tab::Breakdown, Tab::Mechanics, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Build => "Build",
            Tab::Forms => "Forms",
            Tab::Loadout => "Loadout",
            Tab::Breakdown => "Calc",
            Tab::Mechanics => "Mechanics",
            Tab::Help => "Help",
        }
    }
}

/// Editable rows of the Build tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRow {
    Race,
    Subrace,
    Level,
    Stat(StatKind),
}

/// Editable rows of the Mechanics tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanicRow {
    AbsorbMode,
    AbsorbLevel,
    AbsorbNpc,
    PossessTarget,
    PossessSubrace,
    PossessLevel,
    PossessExtra(StatKind),
}

/// Loadout panel focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadoutFocus {
    Slots,
    Catalog,
}

/// A modifier or move slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadoutSlot {
    Modifier(usize),
    Move(usize),
}

/// What a typed number is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Level,
    Manual(StatKind),
    AbsorbLevel,
    PossessLevel,
    PossessExtra(StatKind),
}

/// Numeric text being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub target: InputTarget,
    pub text: String,
}

pub struct App {
    pub catalog: Catalog,
    pub selections: BuildSelections,
    pub build: Build,
    pub current_tab: Tab,
    pub show_help: bool,
    pub share_base: String,
    /// Status line text (share link, load errors)
    pub message: Option<String>,
    pub input: Option<Input>,
    // Build tab
    pub build_row: usize,
    // Forms tab
    pub selected_form: usize,
    pub form_tier: MasteryTier,
    // Loadout tab
    pub loadout_focus: LoadoutFocus,
    pub selected_slot: usize,
    pub selected_entry: usize,
    // Calc tab
    pub breakdown_scroll: usize,
    // Mechanics tab
    pub mechanic_row: usize,
}

impl App {
    pub fn new(catalog: Catalog, share_base: String) -> Self {
        let selections = BuildSelections::new(&catalog);
        let build = selections.compose(&catalog);
        App {
            catalog,
            selections,
            build,
            current_tab: Tab::Build,
            show_help: false,
            share_base,
            message: None,
            input: None,
            build_row: 0,
            selected_form: 0,
            form_tier: MasteryTier::Normal,
            loadout_focus: LoadoutFocus::Slots,
            selected_slot: 0,
            selected_entry: 0,
            breakdown_scroll: 0,
            mechanic_row: 0,
        }
    }

    /// Replace the selections with a share code or build link
    pub fn load_share(&mut self, input: &str) {
        let code = code_from_input(input);
        match decode(&code, &self.catalog) {
            Ok(selections) => {
                info!(race = %selections.race(), level = selections.level(), "build loaded from share code");
                self.selections = selections;
                self.message = Some("Loaded build from share code".to_string());
            }
            Err(e) => {
                warn!(error = %e, "share code rejected");
                self.message = Some(format!("Could not load share code: {}", e));
            }
        }
        self.refresh();
    }

    /// Recompose the build after an edit
    fn refresh(&mut self) {
        self.build = self.selections.compose(&self.catalog);
        self.build_row = self.build_row.min(self.build_rows().len().saturating_sub(1));
        self.selected_form = self.selected_form.min(self.available_forms().len().saturating_sub(1));
        self.mechanic_row = self.mechanic_row.min(self.mechanic_rows().len().saturating_sub(1));
    }

    pub fn final_stats(&self) -> StatBlock {
        self.build.final_stats()
    }

    // ------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }

    pub fn set_tab(&mut self, index: usize) {
        if let Some(tab) = Tab::all().get(index) {
            self.current_tab = *tab;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.current_tab = Tab::Help;
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Build => self.build_row = self.build_row.saturating_sub(1),
            Tab::Forms => self.selected_form = self.selected_form.saturating_sub(1),
            Tab::Loadout => match self.loadout_focus {
                LoadoutFocus::Slots => {
                    self.selected_slot = self.selected_slot.saturating_sub(1);
                    self.selected_entry = 0;
                }
                LoadoutFocus::Catalog => self.selected_entry = self.selected_entry.saturating_sub(1),
            },
            Tab::Breakdown => self.breakdown_scroll = self.breakdown_scroll.saturating_sub(1),
            Tab::Mechanics => self.mechanic_row = self.mechanic_row.saturating_sub(1),
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Build => self.build_row = step(self.build_row, self.build_rows().len()),
            Tab::Forms => self.selected_form = step(self.selected_form, self.available_forms().len()),
            Tab::Loadout => match self.loadout_focus {
                LoadoutFocus::Slots => {
                    self.selected_slot = step(self.selected_slot, MODIFIER_SLOTS + MOVE_SLOTS);
                    self.selected_entry = 0;
                }
                LoadoutFocus::Catalog => {
                    self.selected_entry = step(self.selected_entry, self.slot_choices().len())
                }
            },
            Tab::Breakdown => self.breakdown_scroll += 1,
            Tab::Mechanics => self.mechanic_row = step(self.mechanic_row, self.mechanic_rows().len()),
            Tab::Help => {}
        }
    }

    pub fn on_left(&mut self) {
        match self.current_tab {
            Tab::Build => self.adjust_build_row(-1),
            Tab::Forms => self.form_tier = cycle_tier(self.form_tier, -1),
            Tab::Loadout => self.loadout_focus = LoadoutFocus::Slots,
            Tab::Mechanics => self.adjust_mechanic_row(-1),
            _ => {}
        }
    }

    pub fn on_right(&mut self) {
        match self.current_tab {
            Tab::Build => self.adjust_build_row(1),
            Tab::Forms => self.form_tier = cycle_tier(self.form_tier, 1),
            Tab::Loadout => self.loadout_focus = LoadoutFocus::Catalog,
            Tab::Mechanics => self.adjust_mechanic_row(1),
            _ => {}
        }
    }

    pub fn on_enter(&mut self) {
        match self.current_tab {
            Tab::Build => match self.current_build_row() {
                Some(BuildRow::Level) => self.start_input(InputTarget::Level),
                Some(BuildRow::Stat(stat)) => self.start_input(InputTarget::Manual(stat)),
                Some(BuildRow::Race) | Some(BuildRow::Subrace) => self.adjust_build_row(1),
                None => {}
            },
            Tab::Forms => self.toggle_selected_form(),
            Tab::Loadout => match self.loadout_focus {
                LoadoutFocus::Slots => self.loadout_focus = LoadoutFocus::Catalog,
                LoadoutFocus::Catalog => self.equip_selected(),
            },
            Tab::Mechanics => match self.current_mechanic_row() {
                Some(MechanicRow::AbsorbLevel) => self.start_input(InputTarget::AbsorbLevel),
                Some(MechanicRow::PossessLevel) => self.start_input(InputTarget::PossessLevel),
                Some(MechanicRow::PossessExtra(stat)) => self.start_input(InputTarget::PossessExtra(stat)),
                Some(_) => self.adjust_mechanic_row(1),
                None => {}
            },
            _ => {}
        }
    }

    pub fn on_space(&mut self) {
        if self.current_tab == Tab::Forms {
            self.toggle_selected_form();
        } else {
            self.on_enter();
        }
    }

    // ------------------------------------------------------------------
    // Build tab
    // ------------------------------------------------------------------

    pub fn build_rows(&self) -> Vec<BuildRow> {
        let mut rows = vec![BuildRow::Race];
        if self.race().is_some_and(|r| r.has_subraces()) {
            rows.push(BuildRow::Subrace);
        }
        rows.push(BuildRow::Level);
        rows.extend(StatKind::all().iter().map(|s| BuildRow::Stat(*s)));
        rows
    }

    pub fn current_build_row(&self) -> Option<BuildRow> {
        self.build_rows().get(self.build_row).copied()
    }

    pub fn race(&self) -> Option<&Race> {
        self.selections.race_in(&self.catalog)
    }

    fn adjust_build_row(&mut self, delta: i64) {
        match self.current_build_row() {
            Some(BuildRow::Race) => {
                let names: Vec<String> = self.catalog.races.iter().map(|r| r.name.clone()).collect();
                if let Some(next) = cycle_name(&names, self.selections.race(), delta) {
                    self.selections.select_race(&next, &self.catalog);
                    self.selected_form = 0;
                }
            }
            Some(BuildRow::Subrace) => {
                let names: Vec<String> = self
                    .race()
                    .map(|r| r.subraces.iter().map(|s| s.name.clone()).collect())
                    .unwrap_or_default();
                let current = self.selections.subrace().unwrap_or_default().to_string();
                if let Some(next) = cycle_name(&names, &current, delta) {
                    self.selections.select_subrace(&next, &self.catalog);
                }
            }
            Some(BuildRow::Level) => {
                let level = self.selections.level() as i64 + delta;
                self.selections.set_level(level);
            }
            Some(BuildRow::Stat(stat)) => {
                let points = self.selections.manual().get(stat) as i64 + delta;
                self.selections.set_manual(stat, points);
            }
            None => {}
        }
        self.refresh();
    }

    /// Put every free point into the selected stat
    pub fn quick_max(&mut self) {
        if let Some(BuildRow::Stat(stat)) = self.current_build_row() {
            self.selections.quick_max(stat);
            self.refresh();
        }
    }

    // ------------------------------------------------------------------
    // Forms tab
    // ------------------------------------------------------------------

    /// Forms the selected race and subrace can use, with their catalog index
    /// Forms of the build's race, or of the possessed body while possessing
    pub fn available_forms(&self) -> Vec<(usize, &Form)> {
        self.selections.available_forms(&self.catalog)
    }

    fn toggle_selected_form(&mut self) {
        let Some(index) = self.available_forms().get(self.selected_form).map(|(i, _)| *i) else {
            return;
        };
        self.selections.toggle_form(index, self.form_tier, &self.catalog);
        self.refresh();
    }

    pub fn clear_forms(&mut self) {
        self.selections.clear_forms();
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Loadout tab
    // ------------------------------------------------------------------

    pub fn current_slot(&self) -> LoadoutSlot {
        if self.selected_slot < MODIFIER_SLOTS {
            LoadoutSlot::Modifier(self.selected_slot)
        } else {
            LoadoutSlot::Move(self.selected_slot - MODIFIER_SLOTS)
        }
    }

    /// Catalog entries that fit the selected slot, as `(index, name)`
    pub fn slot_choices(&self) -> Vec<(usize, &str)> {
        match self.current_slot() {
            LoadoutSlot::Modifier(_) => self
                .catalog
                .modifiers
                .iter()
                .enumerate()
                .map(|(i, m)| (i, m.name.as_str()))
                .collect(),
            LoadoutSlot::Move(_) => match self.race() {
                Some(race) => self
                    .catalog
                    .moves_for(race, self.selections.subrace())
                    .map(|(i, m)| (i, m.name.as_str()))
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    fn equip_selected(&mut self) {
        let Some(index) = self.slot_choices().get(self.selected_entry).map(|(i, _)| *i) else {
            return;
        };
        match self.current_slot() {
            LoadoutSlot::Modifier(slot) => {
                self.selections.equip_modifier(slot, Some(index), &self.catalog);
            }
            LoadoutSlot::Move(slot) => {
                self.selections.equip_move(slot, Some(index), &self.catalog);
            }
        }
        self.loadout_focus = LoadoutFocus::Slots;
        self.refresh();
    }

    pub fn unequip_current_slot(&mut self) {
        match self.current_slot() {
            LoadoutSlot::Modifier(slot) => {
                self.selections.equip_modifier(slot, None, &self.catalog);
            }
            LoadoutSlot::Move(slot) => {
                self.selections.equip_move(slot, None, &self.catalog);
            }
        }
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Mechanics tab
    // ------------------------------------------------------------------

    pub fn mechanic(&self) -> Option<RaceMechanic> {
        self.race().and_then(|r| r.mechanic)
    }

    pub fn mechanic_rows(&self) -> Vec<MechanicRow> {
        match self.mechanic() {
            Some(RaceMechanic::Absorption) => {
                let mut rows = vec![MechanicRow::AbsorbMode];
                match self.selections.absorption {
                    AbsorptionState::ClonedLevel { .. } => rows.push(MechanicRow::AbsorbLevel),
                    AbsorptionState::NpcPreset { .. } => rows.push(MechanicRow::AbsorbNpc),
                    AbsorptionState::None => {}
                }
                rows
            }
            Some(RaceMechanic::Possession) => {
                let mut rows = vec![MechanicRow::PossessTarget];
                if let PossessionState::Target { race, .. } = self.selections.possession() {
                    if self.catalog.race(race).is_some_and(|r| r.has_subraces()) {
                        rows.push(MechanicRow::PossessSubrace);
                    }
                    rows.push(MechanicRow::PossessLevel);
                    rows.extend(
                        StatKind::all()
                            .iter()
                            .filter(|s| !s.is_pool())
                            .map(|s| MechanicRow::PossessExtra(*s)),
                    );
                }
                rows
            }
            None => Vec::new(),
        }
    }

    pub fn current_mechanic_row(&self) -> Option<MechanicRow> {
        self.mechanic_rows().get(self.mechanic_row).copied()
    }

    fn adjust_mechanic_row(&mut self, delta: i64) {
        let Some(row) = self.current_mechanic_row() else {
            return;
        };
        let level = self.selections.level();
        let first_npc = self.catalog.npcs.first().map(|n| n.name.clone());

        match row {
            MechanicRow::AbsorbMode => {
                let modes = [
                    Some(AbsorptionState::None),
                    Some(AbsorptionState::ClonedLevel { level }),
                    first_npc.map(|name| AbsorptionState::NpcPreset { name }),
                ];
                let modes: Vec<AbsorptionState> = modes.into_iter().flatten().collect();
                let current = modes
                    .iter()
                    .position(|m| std::mem::discriminant(m) == std::mem::discriminant(&self.selections.absorption))
                    .unwrap_or(0);
                self.selections.absorption = modes[wrap(current, modes.len(), delta)].clone();
            }
            MechanicRow::AbsorbLevel => {
                if let AbsorptionState::ClonedLevel { level } = &mut self.selections.absorption {
                    *level = clamp_level(*level as i64 + delta);
                }
            }
            MechanicRow::AbsorbNpc => {
                let names: Vec<String> = self.catalog.npcs.iter().map(|n| n.name.clone()).collect();
                if let AbsorptionState::NpcPreset { name } = &mut self.selections.absorption {
                    if let Some(next) = cycle_name(&names, name, delta) {
                        *name = next;
                    }
                }
            }
            MechanicRow::PossessTarget => {
                let mut options = vec![String::new()];
                options.extend(self.catalog.possession_targets().map(|r| r.name.clone()));
                let current = match self.selections.possession() {
                    PossessionState::Target { race, .. } => race.clone(),
                    PossessionState::None => String::new(),
                };
                if let Some(next) = cycle_name(&options, &current, delta) {
                    let state = if next.is_empty() {
                        PossessionState::None
                    } else {
                        PossessionState::target(next)
                    };
                    self.selections.set_possession(state, &self.catalog);
                }
            }
            MechanicRow::PossessSubrace => {
                let names: Vec<String> = match self.selections.possession() {
                    PossessionState::Target { race, .. } => self
                        .catalog
                        .race(race)
                        .map(|r| r.subraces.iter().map(|s| s.name.clone()).collect())
                        .unwrap_or_default(),
                    PossessionState::None => Vec::new(),
                };
                self.edit_possession(|state| {
                    if let PossessionState::Target { subrace, .. } = state {
                        let current = subrace
                            .clone()
                            .or_else(|| names.first().cloned())
                            .unwrap_or_default();
                        *subrace = cycle_name(&names, &current, delta);
                    }
                });
            }
            MechanicRow::PossessLevel => self.edit_possession(|state| {
                if let PossessionState::Target { level: body, .. } = state {
                    let current = body.unwrap_or(level);
                    *body = Some(clamp_level(current as i64 + delta));
                }
            }),
            MechanicRow::PossessExtra(stat) => self.edit_possession(|state| {
                if let PossessionState::Target { extra, .. } = state {
                    extra[stat] = (extra[stat] + delta as f64).max(0.0);
                }
            }),
        }
        self.refresh();
    }

    fn edit_possession(&mut self, edit: impl FnOnce(&mut PossessionState)) {
        let mut state = self.selections.possession().clone();
        edit(&mut state);
        self.selections.set_possession(state, &self.catalog);
    }

    // ------------------------------------------------------------------
    // Numeric input
    // ------------------------------------------------------------------

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    fn start_input(&mut self, target: InputTarget) {
        self.input = Some(Input {
            target,
            text: String::new(),
        });
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(input) = &mut self.input {
            if c.is_ascii_digit() || (c == '-' && input.text.is_empty()) {
                input.text.push(c);
            }
        }
    }

    pub fn input_backspace(&mut self) {
        if let Some(input) = &mut self.input {
            input.text.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Write the typed number through the same clamp policy as arrow edits
    pub fn commit_input(&mut self) {
        let Some(Input { target, text }) = self.input.take() else {
            return;
        };
        let value = parse_leading_int(&text);
        match target {
            InputTarget::Level => {
                self.selections.set_level_from_input(&text);
            }
            InputTarget::Manual(stat) => {
                self.selections.set_manual_from_input(stat, &text);
            }
            InputTarget::AbsorbLevel => {
                if let AbsorptionState::ClonedLevel { level } = &mut self.selections.absorption {
                    *level = clamp_level(value);
                }
            }
            InputTarget::PossessLevel => self.edit_possession(|state| {
                if let PossessionState::Target { level, .. } = state {
                    *level = if text.trim().is_empty() {
                        None
                    } else {
                        Some(clamp_level(value))
                    };
                }
            }),
            InputTarget::PossessExtra(stat) => self.edit_possession(|state| {
                if let PossessionState::Target { extra, .. } = state {
                    extra[stat] = value.max(0) as f64;
                }
            }),
        }
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Whole build
    // ------------------------------------------------------------------

    /// Put the share link for the current build in the status line
    pub fn share(&mut self) {
        let code = encode(&self.selections, &self.catalog);
        match share_url(&self.share_base, &code) {
            Ok(url) => {
                info!(%url, "share link created");
                self.message = Some(url);
            }
            Err(e) => {
                warn!(error = %e, base = %self.share_base, "bad share base URL");
                self.message = Some(format!("Share code: {}", code));
            }
        }
    }

    /// Level 1, nothing allocated or equipped; the race is kept
    pub fn reset(&mut self) {
        self.selections.reset();
        self.message = Some("Build reset".to_string());
        self.refresh();
    }
}

/// Next index in a list of `len`, stopping at the end
fn step(current: usize, len: usize) -> usize {
    if current + 1 < len {
        current + 1
    } else {
        current
    }
}

/// `current + delta` wrapped into `0..len`
fn wrap(current: usize, len: usize, delta: i64) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + delta).rem_euclid(len as i64) as usize
}

/// Neighbor of `current` in `names`, wrapping around
fn cycle_name(names: &[String], current: &str, delta: i64) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let idx = names.iter().position(|n| n == current).unwrap_or(0);
    names.get(wrap(idx, names.len(), delta)).cloned()
}

fn cycle_tier(tier: MasteryTier, delta: i64) -> MasteryTier {
    let tiers = MasteryTier::all();
    let idx = tiers.iter().position(|t| *t == tier).unwrap_or(0);
    tiers[wrap(idx, tiers.len(), delta)]
}
