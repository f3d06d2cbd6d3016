use crate::fmt::pct;
use crate::holdings::HoldingsSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskClassification {
    HighConcentration,
    Diversified,
    Unknown,
}

impl RiskClassification {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighConcentration => "High concentration",
            Self::Diversified => "Diversified",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub classification: RiskClassification,
    pub suggestions: Vec<String>,
}

/// Classify concentration risk from the allocation table's top share.
/// The threshold is exclusive: a top share exactly at the threshold still
/// counts as diversified.
pub fn assess_risk(holdings: &HoldingsSummary, threshold_pct: f64) -> RiskAssessment {
    if holdings.total <= 0.0 || holdings.allocation.is_empty() {
        return RiskAssessment {
            classification: RiskClassification::Unknown,
            suggestions: vec!["No portfolio data to analyze concentration".to_string()],
        };
    }

    // Allocation is sorted descending by market value, so the first entry
    // carries the top share.
    let top = &holdings.allocation[0];
    if top.pct > threshold_pct {
        RiskAssessment {
            classification: RiskClassification::HighConcentration,
            suggestions: vec![format!(
                "Asset class {} holds {} of the portfolio; consider diversification",
                top.asset_class,
                pct(top.pct)
            )],
        }
    } else {
        RiskAssessment {
            classification: RiskClassification::Diversified,
            suggestions: vec!["No single asset-class concentration detected".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::AllocationEntry;

    fn summary(entries: &[(&str, f64, f64)], total: f64) -> HoldingsSummary {
        HoldingsSummary {
            holdings: vec![],
            allocation: entries
                .iter()
                .map(|(class, value, pct)| AllocationEntry {
                    asset_class: class.to_string(),
                    market_value: *value,
                    pct: *pct,
                })
                .collect(),
            total,
        }
    }

    #[test]
    fn test_empty_allocation_is_unknown() {
        let assessment = assess_risk(&summary(&[], 0.0), 25.0);
        assert_eq!(assessment.classification, RiskClassification::Unknown);
        assert_eq!(assessment.suggestions.len(), 1);
    }

    #[test]
    fn test_zero_total_is_unknown_even_with_entries() {
        let assessment = assess_risk(&summary(&[("Equity", 0.0, 0.0)], 0.0), 25.0);
        assert_eq!(assessment.classification, RiskClassification::Unknown);
    }

    #[test]
    fn test_top_share_over_threshold_flags_concentration() {
        let s = summary(&[("Equity", 700.0, 70.0), ("Bond", 300.0, 30.0)], 1000.0);
        let assessment = assess_risk(&s, 25.0);
        assert_eq!(assessment.classification, RiskClassification::HighConcentration);
        assert!(assessment.suggestions[0].contains("Equity"));
        assert!(assessment.suggestions[0].contains("70.0%"));
    }

    #[test]
    fn test_exactly_at_threshold_is_diversified() {
        let s = summary(
            &[
                ("Equity", 250.0, 25.0),
                ("Bond", 250.0, 25.0),
                ("Cash", 250.0, 25.0),
                ("Alt", 250.0, 25.0),
            ],
            1000.0,
        );
        let assessment = assess_risk(&s, 25.0);
        assert_eq!(assessment.classification, RiskClassification::Diversified);
    }

    #[test]
    fn test_single_class_portfolio_is_high_concentration() {
        let s = summary(&[("Equity", 1000.0, 100.0)], 1000.0);
        let assessment = assess_risk(&s, 25.0);
        assert_eq!(assessment.classification, RiskClassification::HighConcentration);
    }
}
