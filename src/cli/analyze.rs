use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::warn;

use crate::artifacts::ArtifactStore;
use crate::dataset::load_dataset;
use crate::error::Result;
use crate::fmt::{money, opt_money, pct};
use crate::narrative::{HttpNarrativeGenerator, NarrativeGenerator, PlaceholderNarrative};
use crate::pipeline::{run_pipeline, Snapshot};
use crate::settings::{load_settings, Settings};
use crate::tax::TaxEstimate;

fn select_generator(settings: &Settings, no_narrative: bool) -> Box<dyn NarrativeGenerator> {
    if no_narrative || !settings.narrative.enabled || settings.narrative.api_key.is_empty() {
        return Box::new(PlaceholderNarrative);
    }
    match HttpNarrativeGenerator::new(&settings.narrative) {
        Ok(generator) => Box::new(generator),
        Err(e) => {
            warn!("narrative client unavailable ({e}); using local summary");
            Box::new(PlaceholderNarrative)
        }
    }
}

pub fn run(
    file: &str,
    output: &str,
    user: Option<&str>,
    settings_path: Option<&str>,
    no_narrative: bool,
) -> Result<()> {
    let settings = load_settings(settings_path.map(Path::new))?;
    let dataset = load_dataset(Path::new(file), user)?;
    let generator = select_generator(&settings, no_narrative);

    let case_id = user.unwrap_or("all").to_string();
    let output_dir = PathBuf::from(output);
    let mut store = ArtifactStore::new();
    let snapshot = run_pipeline(
        &dataset,
        &settings,
        generator.as_ref(),
        &output_dir,
        &mut store,
        &case_id,
    )?;

    print_snapshot(&snapshot);

    println!("\n{}", "Artifacts".bold());
    for (name, path) in store.case(&case_id) {
        println!("  {name}: {}", path.display());
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    let m = &snapshot.metrics;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Cash"), Cell::new(money(m.cash))]);
    table.add_row(vec![Cell::new("Portfolio"), Cell::new(money(m.portfolio))]);
    table.add_row(vec![Cell::new("Net worth"), Cell::new(money(m.net_worth))]);
    table.add_row(vec![Cell::new("Liquidity"), Cell::new(pct(m.liquidity_pct))]);
    table.add_row(vec![Cell::new("Income (observed)"), Cell::new(opt_money(m.income))]);
    table.add_row(vec![Cell::new("Expense (observed)"), Cell::new(opt_money(m.expense))]);
    table.add_row(vec![Cell::new("Savings rate"), Cell::new(pct(m.savings_rate))]);
    table.add_row(vec![
        Cell::new("Cash runway"),
        Cell::new(format!("{:.1} months", m.cash_runway_months)),
    ]);
    match &snapshot.tax {
        TaxEstimate::Computed(f) => {
            table.add_row(vec![Cell::new("Federal tax (est.)"), Cell::new(money(f.federal_tax))]);
            table.add_row(vec![Cell::new("State tax (est.)"), Cell::new(money(f.secondary_tax))]);
        }
        TaxEstimate::NoData { .. } => {
            table.add_row(vec![Cell::new("Tax estimate"), Cell::new("no data")]);
        }
    }
    table.add_row(vec![
        Cell::new("Risk"),
        Cell::new(snapshot.risk.classification.label()),
    ]);
    println!("{}", "Snapshot".bold());
    println!("{table}");

    if !snapshot.holdings.allocation.is_empty() {
        let mut alloc = Table::new();
        alloc.set_header(vec!["Asset Class", "Market Value", "%"]);
        for entry in &snapshot.holdings.allocation {
            alloc.add_row(vec![
                Cell::new(&entry.asset_class),
                Cell::new(money(entry.market_value)),
                Cell::new(pct(entry.pct)),
            ]);
        }
        println!("\n{}", "Allocation".bold());
        println!("{alloc}");
    }

    if !snapshot.compliance.flags.is_empty() {
        println!("\n{}", "Compliance flags".bold());
        for flag in &snapshot.compliance.flags {
            println!("  {}", flag.yellow());
        }
    }

    if !snapshot.data_notes.is_empty() {
        println!("\n{}", "Data notes".bold());
        for note in &snapshot.data_notes {
            println!("  {note}");
        }
    }
}
