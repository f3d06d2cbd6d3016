use std::collections::HashMap;

use crate::dataset::Dataset;

// ---------------------------------------------------------------------------
// Semantic roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Symbol,
    Quantity,
    Price,
    MarketValue,
    AssetClass,
    Balance,
    Amount,
    Date,
    Currency,
    CostBasis,
}

impl ColumnRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::MarketValue => "market_value",
            Self::AssetClass => "asset_class",
            Self::Balance => "balance",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Currency => "currency",
            Self::CostBasis => "cost_basis",
        }
    }
}

/// Keyword predicate for one role. `AnyOf` matches a label containing any
/// listed fragment; `AllOf` requires every fragment.
enum Keywords {
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
}

impl Keywords {
    fn matches(&self, label_lower: &str) -> bool {
        match self {
            Self::AnyOf(words) => words.iter().any(|w| label_lower.contains(w)),
            Self::AllOf(words) => words.iter().all(|w| label_lower.contains(w)),
        }
    }
}

// Ordered so MarketValue is tried before Price ("market_value" also
// contains "value", never "price", but keeping explicit precedence makes
// the table read top-down the way resolution happens).
const ROLE_TABLE: &[(ColumnRole, Keywords)] = &[
    (ColumnRole::Symbol, Keywords::AnyOf(&["symbol"])),
    (ColumnRole::Quantity, Keywords::AnyOf(&["quantity", "qty"])),
    (ColumnRole::MarketValue, Keywords::AllOf(&["market", "value"])),
    (ColumnRole::Price, Keywords::AnyOf(&["price"])),
    (ColumnRole::AssetClass, Keywords::AnyOf(&["asset_class", "assetclass"])),
    (ColumnRole::Balance, Keywords::AnyOf(&["balance", "current"])),
    (ColumnRole::Amount, Keywords::AnyOf(&["amount", "amt"])),
    (ColumnRole::Date, Keywords::AnyOf(&["date"])),
    (ColumnRole::Currency, Keywords::AnyOf(&["currency"])),
    (ColumnRole::CostBasis, Keywords::AnyOf(&["cost", "basis"])),
];

// ---------------------------------------------------------------------------
// Concerns
// ---------------------------------------------------------------------------

/// Which slice of the export an aggregator reads. Filtering happens on the
/// lower-cased label before any role keyword is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concern {
    Holdings,
    Transactions,
    Accounts,
    /// Whole dataset, no prefix filter (compliance scans).
    Any,
}

impl Concern {
    fn keeps(&self, label_lower: &str) -> bool {
        match self {
            Self::Holdings => label_lower.contains("accounts__holdings"),
            Self::Transactions => label_lower.starts_with("transactions__"),
            Self::Accounts => {
                label_lower.starts_with("accounts__") && !label_lower.contains("holdings")
            }
            Self::Any => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolved role → column index mapping for one concern. Absence of a role
/// is a valid state every consumer degrades from; it is never an error.
#[derive(Debug, Default)]
pub struct RoleMap {
    entries: HashMap<ColumnRole, usize>,
}

impl RoleMap {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.entries.get(&role).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every role against the concern's column subset. First match in
/// dataset column order wins; later columns matching an already-resolved
/// role are ignored (known simplification, kept deliberately).
pub fn resolve_roles(dataset: &Dataset, concern: Concern) -> RoleMap {
    let lowered: Vec<(usize, String)> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| (i, c.to_lowercase()))
        .filter(|(_, c)| concern.keeps(c))
        .collect();

    let mut entries = HashMap::new();
    for (role, keywords) in ROLE_TABLE {
        if let Some((idx, _)) = lowered.iter().find(|(_, label)| keywords.matches(label)) {
            entries.insert(*role, *idx);
        }
    }
    RoleMap { entries }
}

/// True when any column in the whole dataset matches the role's keywords,
/// regardless of concern prefix.
pub fn any_column_matches(dataset: &Dataset, role: ColumnRole) -> bool {
    let keywords = ROLE_TABLE
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, k)| k)
        .expect("role present in table");
    dataset
        .columns()
        .iter()
        .any(|c| keywords.matches(&c.to_lowercase()))
}

/// The subset of roles relevant when presenting a concern's resolution.
pub fn roles_for_concern(concern: Concern) -> &'static [ColumnRole] {
    match concern {
        Concern::Holdings => &[
            ColumnRole::Symbol,
            ColumnRole::Quantity,
            ColumnRole::Price,
            ColumnRole::MarketValue,
            ColumnRole::AssetClass,
        ],
        Concern::Transactions => &[ColumnRole::Amount, ColumnRole::Date],
        Concern::Accounts => &[ColumnRole::Balance],
        Concern::Any => &[ColumnRole::Currency, ColumnRole::CostBasis],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn dataset(columns: &[&str]) -> Dataset {
        Dataset::from_parts(columns.iter().map(|c| c.to_string()).collect(), vec![]).unwrap()
    }

    #[test]
    fn test_holdings_roles_resolve() {
        let ds = dataset(&[
            "accounts__holdings__symbol",
            "accounts__holdings__quantity",
            "accounts__holdings__price",
            "accounts__holdings__asset_class",
        ]);
        let roles = resolve_roles(&ds, Concern::Holdings);
        assert_eq!(roles.get(ColumnRole::Symbol), Some(0));
        assert_eq!(roles.get(ColumnRole::Quantity), Some(1));
        assert_eq!(roles.get(ColumnRole::Price), Some(2));
        assert_eq!(roles.get(ColumnRole::AssetClass), Some(3));
        assert_eq!(roles.get(ColumnRole::MarketValue), None);
    }

    #[test]
    fn test_concern_filter_excludes_other_sections() {
        // "transactions__amount" must not satisfy the holdings concern even
        // though "amount" is a known keyword.
        let ds = dataset(&["transactions__amount", "accounts__balance"]);
        let roles = resolve_roles(&ds, Concern::Holdings);
        assert!(roles.is_empty());
    }

    #[test]
    fn test_accounts_concern_skips_holdings_columns() {
        let ds = dataset(&["accounts__holdings__market_value", "accounts__balance"]);
        let roles = resolve_roles(&ds, Concern::Accounts);
        assert_eq!(roles.get(ColumnRole::Balance), Some(1));
        assert_eq!(roles.get(ColumnRole::MarketValue), None);
    }

    #[test]
    fn test_first_match_in_column_order_wins() {
        let ds = dataset(&[
            "transactions__amount_gross",
            "transactions__amount_net",
        ]);
        let roles = resolve_roles(&ds, Concern::Transactions);
        assert_eq!(roles.get(ColumnRole::Amount), Some(0));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let ds = dataset(&["Accounts__Holdings__Qty", "Accounts__Holdings__PRICE"]);
        let roles = resolve_roles(&ds, Concern::Holdings);
        assert_eq!(roles.get(ColumnRole::Quantity), Some(0));
        assert_eq!(roles.get(ColumnRole::Price), Some(1));
    }

    #[test]
    fn test_market_value_requires_both_fragments() {
        let ds = dataset(&["accounts__holdings__market_value", "accounts__holdings__value"]);
        let roles = resolve_roles(&ds, Concern::Holdings);
        assert_eq!(roles.get(ColumnRole::MarketValue), Some(0));
    }

    #[test]
    fn test_balance_matches_current_keyword() {
        let ds = dataset(&["accounts__current_value"]);
        let roles = resolve_roles(&ds, Concern::Accounts);
        assert_eq!(roles.get(ColumnRole::Balance), Some(0));
    }

    #[test]
    fn test_any_column_matches_cost_basis() {
        let ds = dataset(&["accounts__holdings__cost_basis"]);
        assert!(any_column_matches(&ds, ColumnRole::CostBasis));
        let ds = dataset(&["accounts__holdings__price"]);
        assert!(!any_column_matches(&ds, ColumnRole::CostBasis));
    }
}
