use crate::columns::{any_column_matches, resolve_roles, ColumnRole, Concern};
use crate::dataset::Dataset;

/// Free-text compliance flags. An empty list is a meaningful "no issues
/// found" result, not a degraded one.
#[derive(Debug, Clone, Default)]
pub struct ComplianceReport {
    pub flags: Vec<String>,
}

/// Two independent, additive checks: non-domestic currency exposure and
/// missing cost-basis data.
pub fn check_compliance(dataset: &Dataset, domestic_currency: &str) -> ComplianceReport {
    let mut flags = Vec::new();

    let roles = resolve_roles(dataset, Concern::Any);
    if let Some(col) = roles.get(ColumnRole::Currency) {
        let foreign = (0..dataset.row_count())
            .map(|row| dataset.cell(row, col).trim())
            .filter(|v| !v.is_empty())
            .any(|v| !v.eq_ignore_ascii_case(domestic_currency));
        if foreign {
            flags.push(format!(
                "Non-{domestic_currency} currency exposures detected; check FBAR/FATCA \
                 triggers for foreign accounts"
            ));
        }
    }

    if !any_column_matches(dataset, ColumnRole::CostBasis) {
        flags.push(
            "No cost-basis columns present; cannot compute precise realized/unrealized \
             capital gains"
                .to_string(),
        );
    }

    ComplianceReport { flags }
}
