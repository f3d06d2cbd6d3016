use chrono::NaiveDate;

use crate::accounts::AccountsSummary;
use crate::compliance::ComplianceReport;
use crate::dataset::Profile;
use crate::fmt::{money, opt_money, pct};
use crate::holdings::HoldingsSummary;
use crate::risk::RiskAssessment;
use crate::tax::TaxEstimate;
use crate::transactions::TransactionSummary;

// ---------------------------------------------------------------------------
// Derived report metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReportMetrics {
    pub cash: f64,
    pub portfolio: f64,
    pub net_worth: f64,
    pub liquidity_pct: f64,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub savings: f64,
    pub savings_rate: f64,
    pub monthly_expense: f64,
    pub cash_runway_months: f64,
    pub annualized_income: Option<f64>,
    /// True when the ×52 short-sample projection was applied.
    pub annualized: bool,
}

impl ReportMetrics {
    pub fn derive(
        accounts: &AccountsSummary,
        holdings: &HoldingsSummary,
        transactions: &TransactionSummary,
        annualization_cutoff_days: i64,
    ) -> Self {
        let cash = accounts.total_cash;
        let portfolio = holdings.total;
        let net_worth = cash + portfolio;
        let liquidity_pct = if net_worth != 0.0 { cash / net_worth * 100.0 } else { 0.0 };

        let income = transactions.income;
        let expense = transactions.expense;
        let savings = match (income, expense) {
            (Some(i), Some(e)) => i - e,
            _ => 0.0,
        };
        let savings_rate = match income {
            Some(i) if i != 0.0 => savings / i * 100.0,
            _ => 0.0,
        };

        let short_sample = transactions
            .period_days()
            .is_some_and(|days| days <= annualization_cutoff_days);
        let annualized = income.is_some() && short_sample;
        let annualized_income = match income {
            Some(i) if short_sample => Some(i * 52.0),
            other => other,
        };

        // Monthly expense mirrors the same heuristic: short samples are
        // weekly figures annualized then split across twelve months.
        let observed_expense = expense.unwrap_or(0.0);
        let monthly_expense = if short_sample {
            observed_expense * 52.0 / 12.0
        } else {
            observed_expense / 12.0
        };
        let cash_runway_months =
            if monthly_expense != 0.0 { cash / monthly_expense } else { 0.0 };

        Self {
            cash,
            portfolio,
            net_worth,
            liquidity_pct,
            income,
            expense,
            savings,
            savings_rate,
            monthly_expense,
            cash_runway_months,
            annualized_income,
            annualized,
        }
    }
}

// ---------------------------------------------------------------------------
// Document rendering
// ---------------------------------------------------------------------------

fn format_period(period: (Option<NaiveDate>, Option<NaiveDate>)) -> String {
    match period {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => "not observed".to_string(),
    }
}

/// Render the final document from the bound values. Pure function: same
/// inputs, same text. Section order is a fixed contract.
#[allow(clippy::too_many_arguments)]
pub fn render_report(
    profile: &Profile,
    metrics: &ReportMetrics,
    holdings: &HoldingsSummary,
    transactions: &TransactionSummary,
    tax: &TaxEstimate,
    risk: &RiskAssessment,
    compliance: &ComplianceReport,
    data_notes: &[String],
    narrative: &str,
) -> String {
    let mut out = String::new();
    let client = profile.get("profile__name");

    out.push_str("# Wealth Snapshot Report\n\n");
    out.push_str(&format!(
        "Client: {client} (age {}, {})\n",
        profile.get("profile__age"),
        profile.get("profile__marital_status"),
    ));
    out.push_str(&format!(
        "Residency: {}, {}\n\n",
        profile.get("profile__residency__city"),
        profile.get("profile__residency__state"),
    ));

    out.push_str("## Snapshot\n\n");
    out.push_str(&format!("- Cash / account balances: {}\n", money(metrics.cash)));
    out.push_str(&format!("- Portfolio market value: {}\n", money(metrics.portfolio)));
    out.push_str(&format!("- Estimated net worth: {}\n", money(metrics.net_worth)));
    out.push_str(&format!(
        "- Liquidity: {} of net worth held as cash\n\n",
        pct(metrics.liquidity_pct)
    ));

    out.push_str("## Observed cash flow\n\n");
    out.push_str(&format!(
        "- Period: {}\n",
        format_period(transactions.period)
    ));
    out.push_str(&format!("- Income: {}\n", opt_money(metrics.income)));
    out.push_str(&format!("- Expense: {}\n", opt_money(metrics.expense)));
    out.push_str(&format!(
        "- Savings: {} (savings rate {})\n",
        money(metrics.savings),
        pct(metrics.savings_rate)
    ));
    out.push_str(&format!(
        "- Cash runway: {:.1} months of observed spending covered by cash\n\n",
        metrics.cash_runway_months
    ));

    out.push_str("## Portfolio allocation\n\n");
    if holdings.allocation.is_empty() {
        out.push_str("No holdings data available.\n\n");
    } else {
        for entry in &holdings.allocation {
            out.push_str(&format!(
                "- {}: {} ({})\n",
                entry.asset_class,
                money(entry.market_value),
                pct(entry.pct)
            ));
        }
        out.push_str(&format!("- Total: {}\n\n", money(holdings.total)));
    }

    out.push_str("## Tax estimate (illustrative)\n\n");
    match tax {
        TaxEstimate::NoData { note } => {
            out.push_str(&format!("Not computed: {note}\n\n"));
        }
        TaxEstimate::Computed(f) => {
            if let Some(annual) = metrics.annualized_income {
                let basis = if metrics.annualized {
                    "projected from the observed sample"
                } else {
                    "taken as already annual"
                };
                out.push_str(&format!(
                    "- Annualized income: {} ({basis})\n",
                    money(annual)
                ));
            }
            out.push_str(&format!(
                "- Taxable income after {} standard deduction: {}\n",
                money(f.standard_deduction),
                money(f.taxable_income)
            ));
            out.push_str(&format!("- Federal tax: {}\n", money(f.federal_tax)));
            out.push_str(&format!("- State tax (flat rate on gross): {}\n\n", money(f.secondary_tax)));
        }
    }

    out.push_str("## Risk\n\n");
    out.push_str(&format!("Classification: {}\n", risk.classification.label()));
    for s in &risk.suggestions {
        out.push_str(&format!("- {s}\n"));
    }
    out.push('\n');

    out.push_str("## Compliance\n\n");
    if compliance.flags.is_empty() {
        out.push_str("No compliance issues found.\n\n");
    } else {
        for flag in &compliance.flags {
            out.push_str(&format!("- {flag}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Data notes\n\n");
    if data_notes.is_empty() {
        out.push_str("All figures derived from complete columns in the upload.\n\n");
    } else {
        for note in data_notes {
            out.push_str(&format!("- {note}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Narrative summary\n\n");
    out.push_str(narrative);
    out.push('\n');

    out
}
