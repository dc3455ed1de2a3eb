//! Builder parameters: the namespace-filtered view of a cell's raw parameters

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::core::Result;
use crate::grid::Direction;

/// A typed record parsed from a JSON compound parameter
pub trait Declaration: DeserializeOwned {
    /// Reject values that parse but cannot be built (negative widths, ...)
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Parse a compound parameter holding one declaration or an array of them.
///
/// A malformed document yields nothing; inside an array every element is parsed
/// and validated on its own, so one bad entry only drops that entry.
pub fn parse_declarations<T: Declaration>(raw: &str, what: &str) -> Vec<T> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Malformed {} declaration, skipped: {}", what, e);
            return Vec::new();
        }
    };
    let elements = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        other => vec![other],
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| {
            let parsed = serde_json::from_value::<T>(element)
                .map_err(crate::core::Error::from)
                .and_then(|decl| decl.validate().map(|()| decl));
            match parsed {
                Ok(decl) => Some(decl),
                Err(e) => {
                    log::warn!("Skipping {} declaration #{}: {}", what, i, e);
                    None
                }
            }
        })
        .collect()
}

/// Filtered, prefix-stripped parameter map handed to a builder's `initialize`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only keys starting with `prefix`, with the prefix removed.
    /// Keys that are nothing but the prefix are dropped.
    pub fn from_namespace(raw: &BTreeMap<String, String>, prefix: &str) -> Self {
        let values = raw
            .iter()
            .filter_map(|(key, value)| {
                let stripped = key.strip_prefix(prefix)?;
                (!stripped.is_empty()).then(|| (stripped.to_string(), value.clone()))
            })
            .collect();
        Self { values }
    }

    /// Add a value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Value if present and not blank
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a value, substituting `default` (with a warning) when it is not a valid `T`
    fn parse_or<T: FromStr + Copy + std::fmt::Display>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.non_blank(key) else {
            return default;
        };
        match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Parameter '{}' has unparsable value '{}', using {}", key, raw, default);
                default
            }
        }
    }

    pub fn i32_or(&self, key: &str, default: i32) -> i32 {
        self.parse_or(key, default)
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.parse_or(key, default)
    }

    pub fn usize_or(&self, key: &str, default: usize) -> usize {
        self.parse_or(key, default)
    }

    /// Float clamped into `[min, max]`; out-of-range values are logged
    pub fn f32_clamped(&self, key: &str, default: f32, min: f32, max: f32) -> f32 {
        let v = self.f32_or(key, default);
        if v < min || v > max || v.is_nan() {
            log::warn!("Parameter '{}' = {} outside [{}, {}], clamped", key, v, min, max);
            if v.is_nan() { default } else { v.clamp(min, max) }
        } else {
            v
        }
    }

    /// Accepts true/false, yes/no, 1/0 (case-insensitive)
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.non_blank(key) else {
            return default;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => true,
            "false" | "no" | "0" | "off" => false,
            _ => {
                log::warn!("Parameter '{}' has non-boolean value '{}', using {}", key, raw, default);
                default
            }
        }
    }

    /// Side name; a misspelled side is an authoring bug and fails
    pub fn side(&self, key: &str) -> Result<Option<Direction>> {
        self.non_blank(key).map(str::parse).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Marker {
        side: Direction,
        level: i32,
    }

    impl Declaration for Marker {
        fn validate(&self) -> Result<()> {
            if self.level < 0 {
                return Err(Error::invalid("level", "negative"));
            }
            Ok(())
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_namespace_filter_strips_prefix() {
        let params = Parameters::from_namespace(
            &raw(&[("g_landLevel", "10"), ("g_road", "[]"), ("color", "red"), ("g_", "x")]),
            "g_",
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("landLevel"), Some("10"));
        assert_eq!(params.get("road"), Some("[]"));
        assert!(!params.contains("color"));
        assert!(!params.contains(""));
    }

    #[test]
    fn test_numeric_parse_falls_back() {
        let params = Parameters::new()
            .with("a", "12")
            .with("b", "twelve")
            .with("c", " 2.5 ")
            .with("d", "   ");
        assert_eq!(params.i32_or("a", 0), 12);
        assert_eq!(params.i32_or("b", 7), 7);
        assert_eq!(params.f32_or("c", 0.0), 2.5);
        assert_eq!(params.i32_or("d", 3), 3);
        assert_eq!(params.i32_or("missing", -1), -1);
    }

    #[test]
    fn test_clamped() {
        let params = Parameters::new().with("r", "1.5").with("s", "0.3");
        assert_eq!(params.f32_clamped("r", 0.0, 0.0, 1.0), 1.0);
        assert_eq!(params.f32_clamped("s", 0.0, 0.0, 1.0), 0.3);
    }

    #[test]
    fn test_bool() {
        let params = Parameters::new().with("a", "TRUE").with("b", "no").with("c", "maybe");
        assert!(params.bool_or("a", false));
        assert!(!params.bool_or("b", true));
        assert!(params.bool_or("c", true));
    }

    #[test]
    fn test_side() {
        let params = Parameters::new().with("s", "ne").with("bad", "up");
        assert_eq!(params.side("s").unwrap(), Some(Direction::NorthEast));
        assert_eq!(params.side("missing").unwrap(), None);
        assert!(matches!(params.side("bad"), Err(Error::UnknownSide(_))));
    }

    #[test]
    fn test_parse_declarations_array_isolates_failures() {
        let decls: Vec<Marker> = parse_declarations(
            r#"[ {"side": "EAST", "level": 100},
                 {"side": "NOWHERE", "level": 5},
                 {"side": "w", "level": -1},
                 {"side": "sw"},
                 {"side": "nw", "level": 7} ]"#,
            "marker",
        );
        assert_eq!(
            decls,
            vec![
                Marker { side: Direction::East, level: 100 },
                Marker { side: Direction::NorthWest, level: 7 },
            ]
        );
    }

    #[test]
    fn test_parse_declarations_single_object() {
        let decls: Vec<Marker> = parse_declarations(r#"{"side": "SE", "level": 3}"#, "marker");
        assert_eq!(decls, vec![Marker { side: Direction::SouthEast, level: 3 }]);
    }

    #[test]
    fn test_parse_declarations_malformed() {
        let decls: Vec<Marker> = parse_declarations(r#"[{"side": "SE", "lev"#, "marker");
        assert!(decls.is_empty());
        let decls: Vec<Marker> = parse_declarations("null", "marker");
        assert!(decls.is_empty());
    }
}
