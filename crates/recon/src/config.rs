use serde::Deserialize;

use crate::error::ReconError;
use crate::key::DatasetKey;

// ---------------------------------------------------------------------------
// Cleaner
// ---------------------------------------------------------------------------

/// OCR cleaner tunables.
///
/// A line's validity ratio is the share of its characters found in
/// `alphabet` or `punctuation`. Lines under `drop_ratio` are removed; lines
/// under `short_line_ratio` are removed when shorter than `short_line_len`
/// characters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub alphabet: String,
    pub punctuation: String,
    pub drop_ratio: f64,
    pub short_line_ratio: f64,
    pub short_line_len: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            alphabet: "abcçdefgğhıijklmnoöprsştuüvyzABCÇDEFGĞHIİJKLMNOÖPRSŞTUÜVYZ".into(),
            punctuation: " .,;:!?'\"-()[]".into(),
            drop_ratio: 0.4,
            short_line_ratio: 0.6,
            short_line_len: 50,
        }
    }
}

impl CleanerConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CleanerConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (name, ratio) in [("drop_ratio", self.drop_ratio), ("short_line_ratio", self.short_line_ratio)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ReconError::ConfigValidation(format!(
                    "{name} must be within 0.0..=1.0, got {ratio}"
                )));
            }
        }
        if self.drop_ratio > self.short_line_ratio {
            return Err(ReconError::ConfigValidation(format!(
                "drop_ratio ({}) must not exceed short_line_ratio ({})",
                self.drop_ratio, self.short_line_ratio
            )));
        }
        if self.alphabet.is_empty() {
            return Err(ReconError::ConfigValidation("alphabet must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Keys (`"s:a"` or `"s"`) whose secondary entry overrides primary.
    pub prefer_secondary: Vec<String>,
    pub clean_primary: bool,
    pub clean_secondary: bool,
    /// Record fields the cleaner touches. Empty = every string field.
    pub clean_fields: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            prefer_secondary: Vec::new(),
            clean_primary: false,
            clean_secondary: false,
            clean_fields: vec!["tefsir".into()],
        }
    }
}

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.prefer_secondary_keys().map(|_| ())
    }

    /// Parsed `prefer_secondary`. Malformed or out-of-range keys are config
    /// errors here: the list is hand-written, not scraped.
    pub fn prefer_secondary_keys(&self) -> Result<Vec<DatasetKey>, ReconError> {
        self.prefer_secondary
            .iter()
            .map(|k| {
                DatasetKey::parse(k).map_err(|e| {
                    ReconError::ConfigValidation(format!("prefer_secondary: {e}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaner_defaults() {
        let cfg = CleanerConfig::from_toml("").unwrap();
        assert_eq!(cfg, CleanerConfig::default());
        assert_eq!(cfg.drop_ratio, 0.4);
        assert_eq!(cfg.short_line_ratio, 0.6);
        assert_eq!(cfg.short_line_len, 50);
    }

    #[test]
    fn cleaner_override_and_validate() {
        let cfg = CleanerConfig::from_toml("drop_ratio = 0.3\nalphabet = \"abc\"").unwrap();
        assert_eq!(cfg.drop_ratio, 0.3);
        assert_eq!(cfg.alphabet, "abc");

        let err = CleanerConfig::from_toml("drop_ratio = 1.5").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));

        let err = CleanerConfig::from_toml("drop_ratio = 0.7").unwrap_err();
        assert!(err.to_string().contains("must not exceed"));

        let err = CleanerConfig::from_toml("drop_ratio = \"x\"").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn merge_keys_validated() {
        let cfg = MergeConfig::from_toml(
            "prefer_secondary = [\"67\", \"76\", \"80\", \"2:255\"]\nclean_secondary = true",
        )
        .unwrap();
        let keys = cfg.prefer_secondary_keys().unwrap();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], DatasetKey::Surah(67));
        assert!(cfg.clean_secondary);
        assert!(!cfg.clean_primary);
        assert_eq!(cfg.clean_fields, vec!["tefsir".to_string()]);

        let err = MergeConfig::from_toml("prefer_secondary = [\"200\"]").unwrap_err();
        assert!(err.to_string().contains("prefer_secondary"));
    }
}
