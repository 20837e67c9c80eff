//! Request feature-map validation
//!
//! Turns a caller-supplied `{ "feature_N": value }` map into an ordered
//! [`FeatureVector`]. Every slot is required; values must coerce to a finite
//! float. Keys outside the layout are ignored.

use serde_json::{Map, Value};

use super::layout::FeatureSlot;
use super::vector::FeatureVector;

/// Slots that were absent or could not be read as numbers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotErrors {
    pub missing: Vec<FeatureSlot>,
    pub malformed: Vec<FeatureSlot>,
}

impl SlotErrors {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.malformed.is_empty()
    }

    /// Wire names of every offending slot, missing first
    pub fn slot_names(&self) -> Vec<String> {
        self.missing
            .iter()
            .chain(self.malformed.iter())
            .map(|slot| slot.name().to_string())
            .collect()
    }
}

impl std::fmt::Display for SlotErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |slots: &[FeatureSlot]| {
            slots.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        };
        match (self.missing.is_empty(), self.malformed.is_empty()) {
            (false, true) => write!(f, "Missing features: {}", join(&self.missing)),
            (true, false) => write!(f, "Non-numeric features: {}", join(&self.malformed)),
            _ => write!(
                f,
                "Missing features: {}; non-numeric features: {}",
                join(&self.missing),
                join(&self.malformed)
            ),
        }
    }
}

impl std::error::Error for SlotErrors {}

/// Coerce a JSON value the way a lenient float conversion would
fn coerce(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    if number.is_finite() {
        Some(number as f32)
    } else {
        None
    }
}

/// Assemble the ordered vector from a feature map
pub fn assemble(features: &Map<String, Value>) -> Result<FeatureVector, SlotErrors> {
    let mut vector = FeatureVector::new();
    let mut errors = SlotErrors::default();

    for slot in FeatureSlot::ALL {
        match features.get(slot.name()) {
            None => errors.missing.push(slot),
            Some(value) => match coerce(value) {
                Some(v) => vector.set(slot, v),
                None => errors.malformed.push(slot),
            },
        }
    }

    if errors.is_empty() {
        Ok(vector)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::FEATURE_NAMES;
    use serde_json::json;

    fn full_map() -> Map<String, Value> {
        FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), json!(i as f64 / 10.0)))
            .collect()
    }

    #[test]
    fn test_assemble_in_slot_order() {
        let vector = assemble(&full_map()).unwrap();
        assert_eq!(vector.get(FeatureSlot::Length), 0.0);
        assert_eq!(vector.get(FeatureSlot::IsShortened), 1.2);
        assert_eq!(vector.get(FeatureSlot::Text31), 4.6);
    }

    #[test]
    fn test_missing_slot_is_named() {
        let mut map = full_map();
        map.remove("feature_12");
        let err = assemble(&map).unwrap_err();
        assert_eq!(err.missing, vec![FeatureSlot::IsShortened]);
        assert_eq!(err.slot_names(), vec!["feature_12".to_string()]);
        assert!(err.to_string().contains("feature_12"));
    }

    #[test]
    fn test_coercion() {
        let mut map = full_map();
        map.insert("feature_3".into(), json!("1"));
        map.insert("feature_4".into(), json!(true));
        map.insert("extra".into(), json!("ignored"));
        let vector = assemble(&map).unwrap();
        assert_eq!(vector.get(FeatureSlot::HasHttps), 1.0);
        assert_eq!(vector.get(FeatureSlot::HasIp), 1.0);
    }

    #[test]
    fn test_malformed_values() {
        let mut map = full_map();
        map.insert("feature_0".into(), json!("abc"));
        map.insert("feature_1".into(), Value::Null);
        map.insert("feature_2".into(), json!([1, 2]));
        map.insert("feature_5".into(), json!("NaN"));
        let err = assemble(&map).unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(
            err.malformed,
            vec![FeatureSlot::Length, FeatureSlot::NumDigits, FeatureSlot::NumParams, FeatureSlot::NumSpecial]
        );
    }

    #[test]
    fn test_empty_map_reports_every_slot() {
        let err = assemble(&Map::new()).unwrap_err();
        assert_eq!(err.missing.len(), FeatureSlot::ALL.len());
    }
}
