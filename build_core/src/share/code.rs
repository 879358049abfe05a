//! Encoding and decoding of share codes
//!
//! A share code is the JSON payload
//! `{"r", "l", "m", "f": [{"i", "s"}], "c", "mv", "as"}` in base64. Race,
//! forms, modifiers and moves are stored by catalog code or index, so a code
//! is only meaningful against the catalog that produced it.

use super::ShareError;
use crate::build::BuildSelections;
use crate::catalog::Catalog;
use crate::stat_block::StatTable;
use crate::types::{MasteryTier, StatKind, MODIFIER_SLOTS, MOVE_SLOTS};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Marker for an empty modifier or move slot
const EMPTY_SLOT: i64 = -1;

#[derive(Serialize)]
struct Payload<'a> {
    r: &'a str,
    l: u32,
    m: StatTable<i64>,
    f: Vec<FormEntry>,
    c: Vec<i64>,
    mv: Vec<i64>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    subrace: Option<&'a str>,
}

#[derive(Serialize)]
struct FormEntry {
    i: usize,
    s: &'static str,
}

/// Encode `selections` as a URL-safe share code.
///
/// Race mechanics (absorption, possession) are not part of the code, so
/// forms borrowed from a possessed body are left out too.
pub fn encode(selections: &BuildSelections, catalog: &Catalog) -> String {
    let race = selections.race_in(catalog);

    let forms = selections
        .forms()
        .iter()
        .filter_map(|active| {
            let index = race.and_then(|r| r.form_index(&active.form.name));
            if index.is_none() {
                warn!(form = %active.form.name, "form not in catalog, left out of share code");
            }
            index.map(|i| FormEntry { i, s: active.tier.code() })
        })
        .collect();

    let payload = Payload {
        r: race.map(|r| r.code.as_str()).unwrap_or_default(),
        l: selections.level(),
        m: selections.manual().stats().map(|_, v| *v as i64),
        f: forms,
        c: slots_to_wire(selections.modifiers.slots()),
        mv: slots_to_wire(selections.moves.slots()),
        subrace: race
            .filter(|r| r.has_subraces())
            .and(selections.subrace()),
    };

    // Serializing plain structs of strings and integers cannot fail
    let json = serde_json::to_string(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn slots_to_wire(slots: &[Option<usize>]) -> Vec<i64> {
    slots
        .iter()
        .map(|slot| slot.map_or(EMPTY_SLOT, |i| i as i64))
        .collect()
}

/// Decode a share code into selections for `catalog`.
///
/// Codes that are not base64, UTF-8 or a JSON object are errors. Inside a
/// well-formed payload every field is best effort: unknown races, forms,
/// modifiers and moves are skipped with a warning and the rest is kept.
pub fn decode(code: &str, catalog: &Catalog) -> Result<BuildSelections, ShareError> {
    let bytes = URL_SAFE_NO_PAD.decode(normalize(code))?;
    let json = String::from_utf8(bytes)?;
    let Value::Object(payload) = serde_json::from_str::<Value>(&json)? else {
        return Err(ShareError::NotAnObject);
    };

    let mut selections = BuildSelections::new(catalog);
    apply_race(&mut selections, &payload, catalog);
    apply_level(&mut selections, &payload);
    apply_manual(&mut selections, &payload);
    apply_forms(&mut selections, &payload, catalog);
    apply_modifiers(&mut selections, &payload, catalog);
    apply_moves(&mut selections, &payload, catalog);

    debug!(race = %selections.race(), level = selections.level(), "share code decoded");
    Ok(selections)
}

/// Decode `code`, falling back to default selections if it is malformed
pub fn decode_or_default(code: &str, catalog: &Catalog) -> BuildSelections {
    decode(code, catalog).unwrap_or_else(|e| {
        warn!(error = %e, "could not load share code, using defaults");
        BuildSelections::new(catalog)
    })
}

/// Map the standard base64 alphabet onto the URL-safe one and drop padding.
/// A `+` that went through query decoding arrives as a space.
fn normalize(code: &str) -> String {
    code.trim()
        .chars()
        .filter_map(|c| match c {
            '+' | ' ' => Some('-'),
            '/' => Some('_'),
            '=' => None,
            c => Some(c),
        })
        .collect()
}

fn apply_race(selections: &mut BuildSelections, payload: &Map<String, Value>, catalog: &Catalog) {
    match payload.get("r").and_then(Value::as_str) {
        Some(code) => match catalog.race_by_code(code) {
            Some(race) => {
                selections.select_race(&race.name, catalog);
            }
            None => warn!(code, "unknown race code, keeping default race"),
        },
        None => warn!("share code has no race, keeping default race"),
    }

    if let Some(subrace) = payload.get("as").and_then(Value::as_str) {
        let has_subraces = selections.race_in(catalog).is_some_and(|r| r.has_subraces());
        if has_subraces {
            selections.select_subrace(subrace, catalog);
        }
    }
}

fn apply_level(selections: &mut BuildSelections, payload: &Map<String, Value>) {
    match payload.get("l").and_then(as_integer) {
        Some(level) => {
            selections.set_level(level);
        }
        None => warn!("share code has no usable level, keeping level 1"),
    }
}

fn apply_manual(selections: &mut BuildSelections, payload: &Map<String, Value>) {
    let Some(manual) = payload.get("m").and_then(Value::as_object) else {
        return;
    };
    for stat in StatKind::all() {
        let Some(value) = manual.get(stat.key()) else {
            continue;
        };
        match as_integer(value) {
            Some(points) => {
                selections.set_manual(*stat, points);
            }
            None => warn!(stat = stat.key(), "manual points are not a number, skipped"),
        }
    }
}

fn apply_forms(selections: &mut BuildSelections, payload: &Map<String, Value>, catalog: &Catalog) {
    let Some(entries) = payload.get("f").and_then(Value::as_array) else {
        return;
    };
    for entry in entries {
        let index = entry.get("i").and_then(Value::as_u64);
        let tier = entry.get("s").and_then(Value::as_str).and_then(MasteryTier::from_code);
        match (index, tier) {
            (Some(index), Some(tier)) => {
                if !selections.activate_form(index as usize, tier, catalog) {
                    warn!(index, "form index not usable by race, skipped");
                }
            }
            _ => warn!(entry = %entry, "malformed form entry, skipped"),
        }
    }
}

fn apply_modifiers(selections: &mut BuildSelections, payload: &Map<String, Value>, catalog: &Catalog) {
    for (slot, index) in slot_indices(payload, "c", MODIFIER_SLOTS) {
        if !selections.equip_modifier(slot, Some(index), catalog) {
            warn!(slot, index, "modifier slot left empty");
        }
    }
}

fn apply_moves(selections: &mut BuildSelections, payload: &Map<String, Value>, catalog: &Catalog) {
    for (slot, index) in slot_indices(payload, "mv", MOVE_SLOTS) {
        if !selections.equip_move(slot, Some(index), catalog) {
            warn!(slot, index, "move slot left empty");
        }
    }
}

/// Filled `(slot, index)` pairs of a slot array; extra slots are ignored
fn slot_indices(payload: &Map<String, Value>, key: &str, slots: usize) -> Vec<(usize, usize)> {
    let Some(values) = payload.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    if values.len() > slots {
        warn!(key, len = values.len(), slots, "too many slots, extra entries ignored");
    }
    values
        .iter()
        .take(slots)
        .enumerate()
        .filter_map(|(slot, value)| match as_integer(value) {
            Some(index) if index >= 0 => Some((slot, index as usize)),
            Some(_) => None,
            None => {
                warn!(key, slot, "slot index is not a number, left empty");
                None
            }
        })
        .collect()
}

/// JSON integer, or a float truncated toward zero
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::reference().unwrap()
    }

    fn code_for(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    #[test]
    fn test_payload_keys() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.set_level(10);
        sel.set_manual(StatKind::MeleeDamage, 3);
        let bytes = URL_SAFE_NO_PAD.decode(encode(&sel, &catalog)).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["r"], "H");
        assert_eq!(value["l"], 10);
        assert_eq!(value["m"]["meleeDamage"], 3);
        assert_eq!(value["c"], serde_json::json!([-1, -1, -1, -1]));
        assert_eq!(value["mv"].as_array().map(Vec::len), Some(10));
        assert!(value.get("as").is_none());
    }

    #[test]
    fn test_subrace_only_for_races_with_subraces() {
        let catalog = catalog();
        let mut sel = BuildSelections::new(&catalog);
        sel.select_race("Alien", &catalog);
        sel.select_subrace("Yardratian", &catalog);
        let bytes = URL_SAFE_NO_PAD.decode(encode(&sel, &catalog)).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["as"], "Yardratian");
        assert_eq!(value["r"], "AL");
    }

    #[test]
    fn test_normalize_accepts_standard_alphabet() {
        assert_eq!(normalize("ab+c/d=="), "ab-c_d");
        assert_eq!(normalize(" ab c\n"), "ab-c");
    }

    #[test]
    fn test_unknown_race_code_keeps_default() {
        let catalog = catalog();
        let sel = decode(&code_for(r#"{"r":"ZZ","l":20}"#), &catalog).unwrap();
        assert_eq!(sel.race(), "Human");
        assert_eq!(sel.level(), 20);
    }

    #[test]
    fn test_level_is_clamped() {
        let catalog = catalog();
        let sel = decode(&code_for(r#"{"r":"S","l":9000}"#), &catalog).unwrap();
        assert_eq!(sel.level(), 305);
    }

    #[test]
    fn test_bad_form_entries_are_skipped() {
        let catalog = catalog();
        let json = r#"{"r":"H","l":5,"f":[{"i":0,"s":"7"},{"i":99,"s":"0"},{"i":0,"s":"1"}]}"#;
        let sel = decode(&code_for(json), &catalog).unwrap();
        assert_eq!(sel.forms().len(), 1);
        assert_eq!(sel.forms().as_slice()[0].tier, MasteryTier::Mastered);
    }

    #[test]
    fn test_not_an_object() {
        let catalog = catalog();
        assert!(matches!(decode(&code_for("[1,2]"), &catalog), Err(ShareError::NotAnObject)));
        assert!(matches!(decode(&code_for("{oops"), &catalog), Err(ShareError::Json(_))));
        assert!(matches!(decode("!!!", &catalog), Err(ShareError::Base64(_))));
    }

    #[test]
    fn test_invalid_utf8() {
        let catalog = catalog();
        let code = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&code, &catalog), Err(ShareError::Utf8(_))));
    }

    #[test]
    fn test_decode_or_default() {
        let catalog = catalog();
        let sel = decode_or_default("%%%", &catalog);
        assert_eq!(sel, BuildSelections::new(&catalog));
    }
}
