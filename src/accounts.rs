use tracing::warn;

use crate::columns::{resolve_roles, ColumnRole, Concern};
use crate::dataset::{coerce_numeric, Dataset};

#[derive(Debug, Clone, Default)]
pub struct AccountsSummary {
    /// Label of the balance-like column that resolved, if any.
    pub balance_column: Option<String>,
    pub total_cash: f64,
}

/// Sum cash-like balances from the non-holdings account columns. No
/// balance column resolved means a total of 0, not an error.
pub fn summarize_accounts(dataset: &Dataset) -> AccountsSummary {
    let roles = resolve_roles(dataset, Concern::Accounts);
    let Some(col) = roles.get(ColumnRole::Balance) else {
        warn!("no balance-like column found; cash total degrades to 0");
        return AccountsSummary::default();
    };

    let total_cash = (0..dataset.row_count())
        .map(|row| coerce_numeric(dataset.cell(row, col)))
        .sum();

    AccountsSummary {
        balance_column: Some(dataset.columns()[col].clone()),
        total_cash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_parts(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sums_balance_column() {
        let ds = dataset(
            &["accounts__balance", "transactions__amount"],
            &[&["1000", "5"], &["2500.50", "6"]],
        );
        let summary = summarize_accounts(&ds);
        assert_eq!(summary.total_cash, 3500.50);
        assert_eq!(summary.balance_column.as_deref(), Some("accounts__balance"));
    }

    #[test]
    fn test_holdings_market_value_not_mistaken_for_balance() {
        // "current" appears in "accounts__holdings__current_value" but the
        // holdings prefix excludes it from the accounts concern.
        let ds = dataset(&["accounts__holdings__current_value"], &[&["999"]]);
        let summary = summarize_accounts(&ds);
        assert_eq!(summary.total_cash, 0.0);
        assert!(summary.balance_column.is_none());
    }

    #[test]
    fn test_no_balance_column_is_zero_not_error() {
        let ds = dataset(&["accounts__type"], &[&["checking"]]);
        let summary = summarize_accounts(&ds);
        assert_eq!(summary.total_cash, 0.0);
    }

    #[test]
    fn test_non_numeric_cells_coerce_to_zero() {
        let ds = dataset(&["accounts__balance"], &[&["n/a"], &["100"]]);
        let summary = summarize_accounts(&ds);
        assert_eq!(summary.total_cash, 100.0);
    }
}
