//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse: the raw TOML is first read into a `toml::Value`, its key
//! tree is compared against the known field names, and typos are reported as
//! warnings with "did you mean?" suggestions. Normal serde deserialization
//! follows. Warnings never break an existing config.

use std::collections::HashSet;

/// Sections whose keys are free-form (status labels), so never flagged.
const FREE_FORM_SECTIONS: &[&str] = &["tiers"];

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `ServiceConfig`.
///
/// Maintained by hand to match the struct hierarchy in service_config.rs.
/// Any new field added to `ServiceConfig` must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.request_timeout_secs",
        "server.max_body_bytes",
        // [storage]
        "storage",
        "storage.backend",
        "storage.path",
        // [model]
        "model",
        "model.path",
        // [projection]
        "projection",
        "projection.trend_window",
        "projection.max_horizon_months",
        "projection.seed",
        // [projection.costs]
        "projection.costs",
        "projection.costs.high",
        "projection.costs.medium",
        "projection.costs.other",
        // [projection.outlook]
        "projection.outlook",
        "projection.outlook.high",
        "projection.outlook.high.high",
        "projection.outlook.high.medium",
        "projection.outlook.high.low",
        "projection.outlook.medium",
        "projection.outlook.medium.high",
        "projection.outlook.medium.medium",
        "projection.outlook.medium.low",
        "projection.outlook.low",
        "projection.outlook.low.high",
        "projection.outlook.low.medium",
        "projection.outlook.low.low",
        // [tiers]
        "tiers",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails: parse errors are reported later by serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .filter(|key| {
            !FREE_FORM_SECTIONS
                .iter()
                .any(|section| key.starts_with(&format!("{section}.")))
        })
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("seed", "seed"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("trend_windw", "trend_window"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [projection]
            [projection.costs]
            high = 5
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"projection".to_string()));
        assert!(keys.contains(&"projection.costs".to_string()));
        assert!(keys.contains(&"projection.costs.high".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[projection]
trend_windw = 10
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "projection.trend_windw");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("projection.trend_window")
        );
    }

    #[test]
    fn test_tier_labels_are_never_flagged() {
        let toml_str = r#"
[tiers]
"Healthy" = "High"
"Root Rot" = "Low"
"#;
        assert!(validate_unknown_keys(toml_str).is_empty());
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[storage]
backend = "memory"

[projection.outlook.medium]
high = 0.3
medium = 0.5
low = 0.2
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_invalid_toml_yields_no_warnings() {
        assert!(validate_unknown_keys("[[[not toml").is_empty());
    }
}
