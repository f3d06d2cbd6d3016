use chrono::NaiveDate;
use tracing::warn;

use crate::columns::{resolve_roles, ColumnRole, Concern};
use crate::dataset::{coerce_date, coerce_numeric, Dataset};

#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub date: Option<NaiveDate>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionSummary {
    /// Sum of positive amounts; None when no amount column resolved.
    pub income: Option<f64>,
    /// Absolute sum of negative amounts (a positive magnitude); None when
    /// no amount column resolved.
    pub expense: Option<f64>,
    /// Observed span over parseable dates; (None, None) when no date
    /// column resolved or nothing parsed.
    pub period: (Option<NaiveDate>, Option<NaiveDate>),
    pub records: Vec<TransactionRecord>,
}

impl TransactionSummary {
    /// Inclusive day count of the observed period, when both ends exist.
    pub fn period_days(&self) -> Option<i64> {
        match self.period {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }
}

/// Partition signed transaction amounts into income and expense totals and
/// derive the observed date span. Amount and date columns resolve
/// independently; either may be absent.
pub fn summarize_transactions(dataset: &Dataset) -> TransactionSummary {
    let roles = resolve_roles(dataset, Concern::Transactions);
    let amount_col = roles.get(ColumnRole::Amount);
    let date_col = roles.get(ColumnRole::Date);

    if amount_col.is_none() {
        warn!("no amount column found in transactions; income/expense degrade to no data");
    }
    if date_col.is_none() {
        warn!("no date column found in transactions; observed period degrades to none");
    }

    let watched: Vec<usize> = [amount_col, date_col].into_iter().flatten().collect();
    if watched.is_empty() {
        return TransactionSummary::default();
    }

    let mut records = Vec::new();
    for row in 0..dataset.row_count() {
        if watched.iter().all(|&c| dataset.cell(row, c).trim().is_empty()) {
            continue;
        }
        records.push(TransactionRecord {
            date: date_col.and_then(|c| coerce_date(dataset.cell(row, c))),
            amount: amount_col.map(|c| coerce_numeric(dataset.cell(row, c))).unwrap_or(0.0),
        });
    }

    let (income, expense) = match amount_col {
        Some(_) => {
            let income: f64 = records.iter().map(|r| r.amount).filter(|a| *a > 0.0).sum();
            let expense: f64 =
                -records.iter().map(|r| r.amount).filter(|a| *a < 0.0).sum::<f64>();
            (Some(income), Some(expense))
        }
        None => (None, None),
    };

    let dates: Vec<NaiveDate> = records.iter().filter_map(|r| r.date).collect();
    let period = (dates.iter().min().copied(), dates.iter().max().copied());

    TransactionSummary { income, expense, period, records }
}
