use std::collections::HashMap;

use tracing::warn;

use crate::columns::{resolve_roles, ColumnRole, Concern};
use crate::dataset::{coerce_numeric, Dataset};

#[derive(Debug, Clone)]
pub struct HoldingRecord {
    pub symbol: String,
    pub asset_class: String,
    pub market_value: f64,
}

#[derive(Debug, Clone)]
pub struct AllocationEntry {
    pub asset_class: String,
    pub market_value: f64,
    pub pct: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HoldingsSummary {
    pub holdings: Vec<HoldingRecord>,
    /// Sorted descending by market value; the top entry drives the
    /// concentration assessment.
    pub allocation: Vec<AllocationEntry>,
    pub total: f64,
}

/// Extract per-row holdings and aggregate them into an allocation table.
///
/// Market value resolution per row: an explicit market-value column always
/// wins; otherwise quantity × price when both resolve; otherwise 0. Values
/// never go below zero. Rows whose holdings cells are all blank are skipped
/// so sparse multi-section exports do not pollute the allocation.
pub fn summarize_holdings(dataset: &Dataset) -> HoldingsSummary {
    let roles = resolve_roles(dataset, Concern::Holdings);
    if roles.is_empty() {
        warn!("no holdings columns found; allocation degrades to empty");
        return HoldingsSummary::default();
    }

    let sym = roles.get(ColumnRole::Symbol);
    let qty = roles.get(ColumnRole::Quantity);
    let price = roles.get(ColumnRole::Price);
    let market = roles.get(ColumnRole::MarketValue);
    let class = roles.get(ColumnRole::AssetClass);

    let holding_cols: Vec<usize> = [sym, qty, price, market, class].into_iter().flatten().collect();

    let mut holdings = Vec::new();
    for row in 0..dataset.row_count() {
        if holding_cols.iter().all(|&c| dataset.cell(row, c).trim().is_empty()) {
            continue;
        }
        let market_value = match (market, qty, price) {
            (Some(m), _, _) => coerce_numeric(dataset.cell(row, m)),
            (None, Some(q), Some(p)) => {
                coerce_numeric(dataset.cell(row, q)) * coerce_numeric(dataset.cell(row, p))
            }
            _ => 0.0,
        }
        .max(0.0);

        let cell_or_unknown = |col: Option<usize>| {
            col.map(|c| dataset.cell(row, c).trim())
                .filter(|v| !v.is_empty())
                .unwrap_or("Unknown")
                .to_string()
        };

        holdings.push(HoldingRecord {
            symbol: cell_or_unknown(sym),
            asset_class: cell_or_unknown(class),
            market_value,
        });
    }

    let mut by_class: HashMap<String, f64> = HashMap::new();
    for h in &holdings {
        *by_class.entry(h.asset_class.clone()).or_default() += h.market_value;
    }
    let total: f64 = by_class.values().sum();
    // Divisor forced to 1 when the portfolio is worthless: percentages
    // become 0 rather than NaN.
    let divisor = if total != 0.0 { total } else { 1.0 };

    let mut allocation: Vec<AllocationEntry> = by_class
        .into_iter()
        .map(|(asset_class, market_value)| AllocationEntry {
            asset_class,
            market_value,
            pct: market_value / divisor * 100.0,
        })
        .collect();
    allocation.sort_by(|a, b| {
        b.market_value
            .partial_cmp(&a.market_value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.asset_class.cmp(&b.asset_class))
    });

    HoldingsSummary { holdings, allocation, total }
}
