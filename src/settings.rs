use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};

/// One marginal-rate span of the progressive federal table.
/// `upper: None` means the bracket is open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSettings {
    #[serde(default = "default_brackets")]
    pub brackets: Vec<TaxBracket>,
    #[serde(default = "default_standard_deduction")]
    pub standard_deduction: f64,
    /// Flat secondary (state-level) rate, applied to gross income.
    #[serde(default = "default_secondary_rate")]
    pub secondary_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    #[serde(default = "default_concentration_threshold")]
    pub concentration_threshold_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSettings {
    #[serde(default = "default_domestic_currency")]
    pub domestic_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSettings {
    #[serde(default = "default_narrative_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_narrative_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_tax")]
    pub tax: TaxSettings,
    #[serde(default = "default_risk")]
    pub risk: RiskSettings,
    #[serde(default = "default_compliance")]
    pub compliance: ComplianceSettings,
    /// Observed periods spanning at most this many days are treated as
    /// one-week samples when annualizing.
    #[serde(default = "default_annualization_cutoff")]
    pub annualization_cutoff_days: i64,
    #[serde(default = "default_narrative")]
    pub narrative: NarrativeSettings,
}

// 2022 federal brackets, married filing jointly. Illustrative and tunable,
// not authoritative.
fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket { lower: 0.0, upper: Some(20550.0), rate: 0.10 },
        TaxBracket { lower: 20550.0, upper: Some(83550.0), rate: 0.12 },
        TaxBracket { lower: 83550.0, upper: Some(178150.0), rate: 0.22 },
        TaxBracket { lower: 178150.0, upper: Some(340100.0), rate: 0.24 },
        TaxBracket { lower: 340100.0, upper: Some(431900.0), rate: 0.32 },
        TaxBracket { lower: 431900.0, upper: Some(647850.0), rate: 0.35 },
        TaxBracket { lower: 647850.0, upper: None, rate: 0.37 },
    ]
}

fn default_standard_deduction() -> f64 {
    30000.0
}

fn default_secondary_rate() -> f64 {
    0.06
}

fn default_concentration_threshold() -> f64 {
    25.0
}

fn default_domestic_currency() -> String {
    "USD".to_string()
}

fn default_annualization_cutoff() -> i64 {
    14
}

fn default_narrative_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        .to_string()
}

fn default_narrative_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_tax() -> TaxSettings {
    TaxSettings {
        brackets: default_brackets(),
        standard_deduction: default_standard_deduction(),
        secondary_rate: default_secondary_rate(),
    }
}

fn default_risk() -> RiskSettings {
    RiskSettings {
        concentration_threshold_pct: default_concentration_threshold(),
    }
}

fn default_compliance() -> ComplianceSettings {
    ComplianceSettings {
        domestic_currency: default_domestic_currency(),
    }
}

fn default_narrative() -> NarrativeSettings {
    NarrativeSettings {
        endpoint: default_narrative_endpoint(),
        api_key: String::new(),
        timeout_secs: default_narrative_timeout(),
        enabled: default_true(),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tax: default_tax(),
            risk: default_risk(),
            compliance: default_compliance(),
            annualization_cutoff_days: default_annualization_cutoff(),
            narrative: default_narrative(),
        }
    }
}

impl Settings {
    /// Sanity-check the bracket table: ascending, non-overlapping, with
    /// non-negative rates. A misconfigured table is a settings error, not
    /// something to silently compute nonsense from.
    pub fn validate(&self) -> Result<()> {
        let brackets = &self.tax.brackets;
        if brackets.is_empty() {
            return Err(SnapError::Settings("tax bracket table is empty".to_string()));
        }
        let mut prev_upper = 0.0_f64;
        for (i, b) in brackets.iter().enumerate() {
            if b.rate < 0.0 {
                return Err(SnapError::Settings(format!(
                    "bracket {i} has negative rate {}",
                    b.rate
                )));
            }
            if i > 0 && (b.lower - prev_upper).abs() > f64::EPSILON {
                return Err(SnapError::Settings(format!(
                    "bracket {i} lower bound {} does not continue from {}",
                    b.lower, prev_upper
                )));
            }
            match b.upper {
                Some(u) if u <= b.lower => {
                    return Err(SnapError::Settings(format!(
                        "bracket {i} upper bound {} is not above lower bound {}",
                        u, b.lower
                    )));
                }
                Some(u) => prev_upper = u,
                None => {
                    if i != brackets.len() - 1 {
                        return Err(SnapError::Settings(
                            "open-ended bracket must be last".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("wealthsnap")
        .join("settings.json")
}

/// Load settings. An explicit path must exist and parse; the default
/// location falls back to built-in defaults when absent. The
/// `WEALTHSNAP_API_KEY` environment variable overrides the configured
/// narrative key either way.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match explicit {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SnapError::Settings(format!("cannot read {}: {e}", path.display()))
            })?;
            serde_json::from_str(&content)
                .map_err(|e| SnapError::Settings(format!("cannot parse {}: {e}", path.display())))?
        }
        None => {
            let path = default_settings_path();
            if path.exists() {
                let content = std::fs::read_to_string(&path).unwrap_or_default();
                serde_json::from_str(&content).unwrap_or_default()
            } else {
                Settings::default()
            }
        }
    };
    if let Ok(key) = std::env::var("WEALTHSNAP_API_KEY") {
        if !key.is_empty() {
            settings.narrative.api_key = key;
        }
    }
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = Settings::default();
        s.validate().unwrap();
        assert_eq!(s.tax.brackets.len(), 7);
        assert_eq!(s.tax.standard_deduction, 30000.0);
        assert_eq!(s.risk.concentration_threshold_pct, 25.0);
        assert_eq!(s.compliance.domestic_currency, "USD");
        assert_eq!(s.annualization_cutoff_days, 14);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let json = r#"{"risk": {"concentration_threshold_pct": 40.0}}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.risk.concentration_threshold_pct, 40.0);
        assert_eq!(s.tax.standard_deduction, 30000.0);
        assert_eq!(s.compliance.domestic_currency, "USD");
    }

    #[test]
    fn test_explicit_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.compliance.domestic_currency = "EUR".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&s).unwrap()).unwrap();
        let loaded = load_settings(Some(&path)).unwrap();
        assert_eq!(loaded.compliance.domestic_currency, "EUR");
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, SnapError::Settings(_)));
    }

    #[test]
    fn test_validate_rejects_gap_in_brackets() {
        let mut s = Settings::default();
        s.tax.brackets = vec![
            TaxBracket { lower: 0.0, upper: Some(1000.0), rate: 0.1 },
            TaxBracket { lower: 2000.0, upper: None, rate: 0.2 },
        ];
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let mut s = Settings::default();
        s.tax.brackets.clear();
        assert!(s.validate().is_err());
    }
}
