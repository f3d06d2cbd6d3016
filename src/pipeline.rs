use std::path::Path;

use tracing::info;

use crate::accounts::{summarize_accounts, AccountsSummary};
use crate::artifacts::ArtifactStore;
use crate::charts;
use crate::compliance::{check_compliance, ComplianceReport};
use crate::dataset::{extract_profile, Dataset, Profile};
use crate::error::Result;
use crate::holdings::{summarize_holdings, HoldingsSummary};
use crate::narrative::{narrative_or_fallback, NarrativeGenerator, NarrativePayload};
use crate::report::{render_report, ReportMetrics};
use crate::risk::{assess_risk, RiskAssessment};
use crate::settings::Settings;
use crate::tax::{estimate_tax, TaxEstimate};
use crate::transactions::{summarize_transactions, TransactionSummary};

/// Everything derived from one dataset in one run. Pure function of the
/// dataset and configuration; nothing here touches the filesystem.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub profile: Profile,
    pub accounts: AccountsSummary,
    pub holdings: HoldingsSummary,
    pub transactions: TransactionSummary,
    pub metrics: ReportMetrics,
    pub tax: TaxEstimate,
    pub risk: RiskAssessment,
    pub compliance: ComplianceReport,
    /// Degraded/default inputs the report must disclose.
    pub data_notes: Vec<String>,
}

pub fn derive_snapshot(dataset: &Dataset, settings: &Settings) -> Snapshot {
    let profile = extract_profile(dataset);
    let holdings = summarize_holdings(dataset);
    let transactions = summarize_transactions(dataset);
    let accounts = summarize_accounts(dataset);
    let metrics = ReportMetrics::derive(
        &accounts,
        &holdings,
        &transactions,
        settings.annualization_cutoff_days,
    );
    let tax = estimate_tax(metrics.annualized_income, &settings.tax);
    let risk = assess_risk(&holdings, settings.risk.concentration_threshold_pct);
    let compliance = check_compliance(dataset, &settings.compliance.domestic_currency);

    let mut data_notes = Vec::new();
    if holdings.allocation.is_empty() {
        data_notes.push("No holdings data found; portfolio figures default to zero".to_string());
    }
    if transactions.income.is_none() {
        data_notes.push(
            "No transaction amount column; income and expense not observed".to_string(),
        );
    } else if transactions.period == (None, None) {
        data_notes.push(
            "No usable transaction dates; observed income treated as already annual".to_string(),
        );
    }
    if let Some(days) = transactions.period_days() {
        if metrics.annualized {
            data_notes.push(format!(
                "Income annualized from a {days}-day observed sample (x52); treat projected \
                 figures as illustrative"
            ));
        }
    }
    if accounts.balance_column.is_none() {
        data_notes.push("No account balance column; cash defaults to zero".to_string());
    }
    if matches!(tax, TaxEstimate::Computed(_)) {
        data_notes.push(
            "State tax is a flat rate on gross income while federal tax uses income after \
             the standard deduction; simplified illustration"
                .to_string(),
        );
    }

    Snapshot {
        profile,
        accounts,
        holdings,
        transactions,
        metrics,
        tax,
        risk,
        compliance,
        data_notes,
    }
}

fn narrative_payload(snapshot: &Snapshot) -> NarrativePayload {
    let figures = snapshot.tax.figures();
    NarrativePayload {
        client_name: snapshot.profile.get("profile__name").to_string(),
        cash: snapshot.metrics.cash,
        portfolio_total: snapshot.metrics.portfolio,
        net_worth: snapshot.metrics.net_worth,
        liquidity_pct: snapshot.metrics.liquidity_pct,
        income: snapshot.metrics.income,
        expense: snapshot.metrics.expense,
        savings_rate: snapshot.metrics.savings_rate,
        federal_tax: figures.map(|f| f.federal_tax),
        secondary_tax: figures.map(|f| f.secondary_tax),
        risk_classification: snapshot.risk.classification.label().to_string(),
        compliance_flags: snapshot.compliance.flags.clone(),
    }
}

// ---------------------------------------------------------------------------
// Artifact writers
// ---------------------------------------------------------------------------

fn write_holdings_csv(path: &Path, holdings: &HoldingsSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["symbol", "asset_class", "market_value"])?;
    for h in &holdings.holdings {
        wtr.write_record([
            h.symbol.as_str(),
            h.asset_class.as_str(),
            format!("{:.2}", h.market_value).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_allocation_csv(path: &Path, holdings: &HoldingsSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["asset_class", "market_value", "pct"])?;
    for a in &holdings.allocation {
        wtr.write_record([
            a.asset_class.as_str(),
            format!("{:.2}", a.market_value).as_str(),
            format!("{:.1}", a.pct).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_transactions_csv(path: &Path, transactions: &TransactionSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["date", "amount"])?;
    for r in &transactions.records {
        let date = r.date.map(|d| d.to_string()).unwrap_or_default();
        wtr.write_record([date.as_str(), format!("{:.2}", r.amount).as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Derive the snapshot and write the full artifact set. The store is owned
/// by the caller; artifact locations are registered under `case_id`.
/// Narrative generation is best-effort: failures land in the document as a
/// marker string, never as a pipeline error.
pub fn run_pipeline(
    dataset: &Dataset,
    settings: &Settings,
    generator: &dyn NarrativeGenerator,
    output_dir: &Path,
    store: &mut ArtifactStore,
    case_id: &str,
) -> Result<Snapshot> {
    std::fs::create_dir_all(output_dir)?;
    let snapshot = derive_snapshot(dataset, settings);

    if !snapshot.holdings.holdings.is_empty() {
        let path = output_dir.join("holdings.csv");
        write_holdings_csv(&path, &snapshot.holdings)?;
        store.set(case_id, "holdings_csv", &path);
    }
    if !snapshot.holdings.allocation.is_empty() {
        let path = output_dir.join("allocation.csv");
        write_allocation_csv(&path, &snapshot.holdings)?;
        store.set(case_id, "allocation_csv", &path);
    }
    if !snapshot.transactions.records.is_empty() {
        let path = output_dir.join("transactions.csv");
        write_transactions_csv(&path, &snapshot.transactions)?;
        store.set(case_id, "transactions_csv", &path);
    }

    if !snapshot.holdings.allocation.is_empty() && snapshot.holdings.total > 0.0 {
        let path = output_dir.join("allocation.png");
        charts::render_allocation_pie(&path, &snapshot.holdings.allocation)?;
        store.set(case_id, "allocation_chart", &path);
    }
    let bars_path = output_dir.join("income_expense.png");
    charts::render_income_expense_bars(
        &bars_path,
        snapshot.metrics.income.unwrap_or(0.0),
        snapshot.metrics.expense.unwrap_or(0.0),
    )?;
    store.set(case_id, "income_expense_chart", &bars_path);

    let narrative = narrative_or_fallback(generator, &narrative_payload(&snapshot));
    let document = render_report(
        &snapshot.profile,
        &snapshot.metrics,
        &snapshot.holdings,
        &snapshot.transactions,
        &snapshot.tax,
        &snapshot.risk,
        &snapshot.compliance,
        &snapshot.data_notes,
        &narrative,
    );
    let report_path = output_dir.join("wealth_report.md");
    std::fs::write(&report_path, document)?;
    store.set(case_id, "report_document", &report_path);
    info!(path = %report_path.display(), "report written");

    Ok(snapshot)
}
