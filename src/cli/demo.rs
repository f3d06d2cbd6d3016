use std::path::Path;

use crate::error::Result;

const USER_ID: &str = "u_1001";

const COLUMNS: &[&str] = &[
    "profile__user_id",
    "profile__name",
    "profile__age",
    "profile__marital_status",
    "profile__residency__state",
    "profile__residency__city",
    "profile__dependents__name",
    "profile__dependents__age",
    "accounts__name",
    "accounts__balance",
    "accounts__currency",
    "accounts__holdings__symbol",
    "accounts__holdings__quantity",
    "accounts__holdings__price",
    "accounts__holdings__asset_class",
    "transactions__date",
    "transactions__amount",
    "transactions__description",
];

struct DemoAccount {
    name: &'static str,
    balance: &'static str,
    currency: &'static str,
}

const ACCOUNTS: &[DemoAccount] = &[
    DemoAccount { name: "Everyday Checking", balance: "32000.00", currency: "USD" },
    DemoAccount { name: "High-Yield Savings", balance: "10500.00", currency: "USD" },
];

struct DemoHolding {
    symbol: &'static str,
    quantity: &'static str,
    price: &'static str,
    asset_class: &'static str,
}

const HOLDINGS: &[DemoHolding] = &[
    DemoHolding { symbol: "VTI", quantity: "120", price: "220.35", asset_class: "Equity" },
    DemoHolding { symbol: "BND", quantity: "200", price: "72.10", asset_class: "Bond" },
    DemoHolding { symbol: "AAPL", quantity: "50", price: "189.90", asset_class: "Equity" },
    DemoHolding { symbol: "VNQ", quantity: "80", price: "84.25", asset_class: "Real Estate" },
];

struct DemoTxn {
    date: &'static str,
    amount: &'static str,
    description: &'static str,
}

// One observed week, so analyze exercises the short-sample annualization.
const TRANSACTIONS: &[DemoTxn] = &[
    DemoTxn { date: "2025-03-01", amount: "2000.00", description: "ACME PAYROLL" },
    DemoTxn { date: "2025-03-02", amount: "-150.25", description: "WHOLE FOODS MARKET" },
    DemoTxn { date: "2025-03-03", amount: "-60.00", description: "PACIFIC GAS AND ELECTRIC" },
    DemoTxn { date: "2025-03-04", amount: "-45.80", description: "NOPA RESTAURANT" },
    DemoTxn { date: "2025-03-05", amount: "-120.00", description: "STATE FARM INSURANCE" },
    DemoTxn { date: "2025-03-06", amount: "-35.50", description: "SHELL FUEL" },
    DemoTxn { date: "2025-03-07", amount: "-88.45", description: "TARGET STORE" },
];

fn col(name: &str) -> usize {
    COLUMNS.iter().position(|c| *c == name).expect("known column")
}

fn blank_row() -> Vec<String> {
    let mut row = vec![String::new(); COLUMNS.len()];
    row[col("profile__user_id")] = USER_ID.to_string();
    row
}

/// Write the deterministic synthetic export: one row per record, all under
/// a single subject id.
pub fn write_sample(path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(COLUMNS)?;

    let mut rows = Vec::new();
    for (i, account) in ACCOUNTS.iter().enumerate() {
        let mut row = blank_row();
        if i == 0 {
            row[col("profile__name")] = "Alex Parker".to_string();
            row[col("profile__age")] = "34".to_string();
            row[col("profile__marital_status")] = "married".to_string();
            row[col("profile__residency__state")] = "CA".to_string();
            row[col("profile__residency__city")] = "San Francisco".to_string();
            row[col("profile__dependents__name")] = "Mia".to_string();
            row[col("profile__dependents__age")] = "4".to_string();
        }
        row[col("accounts__name")] = account.name.to_string();
        row[col("accounts__balance")] = account.balance.to_string();
        row[col("accounts__currency")] = account.currency.to_string();
        rows.push(row);
    }
    for holding in HOLDINGS {
        let mut row = blank_row();
        row[col("accounts__holdings__symbol")] = holding.symbol.to_string();
        row[col("accounts__holdings__quantity")] = holding.quantity.to_string();
        row[col("accounts__holdings__price")] = holding.price.to_string();
        row[col("accounts__holdings__asset_class")] = holding.asset_class.to_string();
        rows.push(row);
    }
    for txn in TRANSACTIONS {
        let mut row = blank_row();
        row[col("transactions__date")] = txn.date.to_string();
        row[col("transactions__amount")] = txn.amount.to_string();
        row[col("transactions__description")] = txn.description.to_string();
        rows.push(row);
    }

    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(output: &str) -> Result<()> {
    let path = Path::new(output);
    write_sample(path)?;

    println!("Sample export written to {}", path.display());
    println!("  Subject:      {USER_ID}");
    println!("  Accounts:     {}", ACCOUNTS.len());
    println!("  Holdings:     {}", HOLDINGS.len());
    println!("  Transactions: {}", TRANSACTIONS.len());
    println!();
    println!("Try these next:");
    println!("  wealthsnap inspect {output}");
    println!("  wealthsnap analyze {output} --user {USER_ID} --no-narrative");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_dataset;
    use crate::pipeline::derive_snapshot;
    use crate::risk::RiskClassification;
    use crate::settings::Settings;

    #[test]
    fn test_sample_loads_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        write_sample(&path).unwrap();
        let ds = load_dataset(&path, Some(USER_ID)).unwrap();
        assert_eq!(
            ds.row_count(),
            ACCOUNTS.len() + HOLDINGS.len() + TRANSACTIONS.len()
        );
    }

    #[test]
    fn test_sample_snapshot_figures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        write_sample(&path).unwrap();
        let ds = load_dataset(&path, Some(USER_ID)).unwrap();
        let snapshot = derive_snapshot(&ds, &Settings::default());

        assert_eq!(snapshot.metrics.cash, 42500.0);
        assert!((snapshot.holdings.total - 57097.0).abs() < 1e-6);
        assert_eq!(snapshot.metrics.income, Some(2000.0));
        assert!((snapshot.metrics.expense.unwrap() - 500.0).abs() < 1e-9);
        // One-week sample annualizes.
        assert_eq!(snapshot.metrics.annualized_income, Some(104000.0));
        // Equity dominates the sample portfolio.
        assert_eq!(
            snapshot.risk.classification,
            RiskClassification::HighConcentration
        );
        // USD-only currencies, no cost-basis columns.
        assert_eq!(snapshot.compliance.flags.len(), 1);
        assert!(snapshot.compliance.flags[0].contains("cost-basis"));
    }

    #[test]
    fn test_sample_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_sample(&a).unwrap();
        write_sample(&b).unwrap();
        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            std::fs::read_to_string(&b).unwrap()
        );
    }
}
