//! Config validation: unknown-key detection with Levenshtein suggestions
//! and value range checks.
//!
//! Two-pass parse: the raw TOML is first read into a `toml::Value`, its key
//! tree is compared against the known field names and unknown keys are
//! reported with "did you mean" suggestions. Normal serde deserialization
//! follows. Unknown keys never fail a load.

use std::collections::HashSet;

use crate::validation::{MAX_TIME_STEPS, PRESSURE_THRESHOLD_RANGE};

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

/// Returns the complete set of valid dotted key paths for ServiceConfig.
///
/// Maintained by hand to match the struct hierarchy in service_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [model]
        "model",
        "model.version",
        "model.default_time_steps",
        "model.default_pressure_threshold",
        "model.max_time_steps",
        // [simulation]
        "simulation",
        "simulation.seed",
        // [validation]
        "validation",
        "validation.strict_fouling_status",
        // [history]
        "history",
        "history.capacity",
        // [cors]
        "cors",
        "cors.allowed_origins",
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

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Parse errors yield no warnings; serde reports them on the second pass.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed ServiceConfig.
///
/// Returns (errors, warnings). Errors are values the service cannot run
/// with; warnings are legal but likely unintended.
pub fn validate_ranges(config: &super::ServiceConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let m = &config.model;

    if m.max_time_steps == 0 || m.max_time_steps > MAX_TIME_STEPS {
        errors.push(format!(
            "model.max_time_steps = {} is outside 1-{MAX_TIME_STEPS}",
            m.max_time_steps
        ));
    }

    let horizon_cap = m.max_time_steps.min(MAX_TIME_STEPS);
    if m.default_time_steps == 0 || m.default_time_steps > horizon_cap {
        errors.push(format!(
            "model.default_time_steps = {} must be within 1-{horizon_cap}",
            m.default_time_steps
        ));
    }

    let threshold = m.default_pressure_threshold;
    if !threshold.is_finite() || !PRESSURE_THRESHOLD_RANGE.contains(threshold) {
        errors.push(format!(
            "model.default_pressure_threshold = {threshold:.2} is outside {:.0}-{:.0} PSIG",
            PRESSURE_THRESHOLD_RANGE.min, PRESSURE_THRESHOLD_RANGE.max
        ));
    }

    if m.version.trim().is_empty() {
        errors.push("model.version must not be empty".to_string());
    }

    if config.server.addr.parse::<std::net::SocketAddr>().is_err() {
        errors.push(format!(
            "server.addr = '{}' is not a valid socket address",
            config.server.addr
        ));
    }

    if config.history.capacity == 0 {
        warnings.push(ValidationWarning {
            field: "history.capacity".to_string(),
            message: "history.capacity = 0 disables the prediction log".to_string(),
            suggestion: None,
        });
    }

    if config.simulation.seed.is_some() {
        warnings.push(ValidationWarning {
            field: "simulation.seed".to_string(),
            message: "simulation.seed is set: every prediction replays the same random draws".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("capacity", "capacity"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("capacty", "capacity"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [model]
            default_time_steps = 20
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"model".to_string()));
        assert!(keys.contains(&"model.default_time_steps".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[history]
capacty = 50
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("capacty"));
        assert_eq!(warnings[0].suggestion.as_deref(), Some("history.capacity"));
        assert!(warnings[0].to_string().contains("did you mean 'history.capacity'"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[model]
default_pressure_threshold = 8.0

[validation]
strict_fouling_status = true

[cors]
allowed_origins = ["http://localhost:3000"]
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[database]\nurl = \"sqlite://x\"\n");
        assert!(warnings.iter().any(|w| w.field == "database"));
        assert!(warnings.iter().any(|w| w.field == "database.url"));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_defaults_clean() {
        let (errors, warnings) = validate_ranges(&ServiceConfig::default());
        assert!(errors.is_empty(), "Defaults should produce no errors: {:?}", errors);
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {:?}", warnings);
    }

    #[test]
    fn test_max_time_steps_above_hard_limit() {
        let mut config = ServiceConfig::default();
        config.model.max_time_steps = 80;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("max_time_steps")));
    }

    #[test]
    fn test_default_time_steps_above_max() {
        let mut config = ServiceConfig::default();
        config.model.max_time_steps = 10;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("default_time_steps")));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = ServiceConfig::default();
        config.model.default_pressure_threshold = 20.0;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("default_pressure_threshold")));
    }

    #[test]
    fn test_bad_addr() {
        let mut config = ServiceConfig::default();
        config.server.addr = "localhost".to_string();
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("server.addr")));
    }

    #[test]
    fn test_seed_and_zero_capacity_warn() {
        let mut config = ServiceConfig::default();
        config.simulation.seed = Some(1);
        config.history.capacity = 0;
        let (errors, warnings) = validate_ranges(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 2);
    }
}
