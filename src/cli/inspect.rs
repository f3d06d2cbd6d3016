use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::columns::{resolve_roles, roles_for_concern, Concern};
use crate::dataset::{load_dataset, Dataset};
use crate::error::Result;

/// Print which column resolved for each semantic role, per concern, so a
/// user can see what will degrade before running an analysis.
pub fn run(file: &str, user: Option<&str>) -> Result<()> {
    let dataset = load_dataset(Path::new(file), user)?;

    println!(
        "{} rows, {} columns",
        dataset.row_count(),
        dataset.columns().len()
    );

    for (label, concern) in [
        ("Holdings", Concern::Holdings),
        ("Transactions", Concern::Transactions),
        ("Accounts", Concern::Accounts),
        ("Whole dataset", Concern::Any),
    ] {
        println!("\n{}", label.bold());
        println!("{}", concern_table(&dataset, concern));
    }
    Ok(())
}

fn concern_table(dataset: &Dataset, concern: Concern) -> Table {
    let roles = resolve_roles(dataset, concern);
    let mut table = Table::new();
    table.set_header(vec!["Role", "Column"]);
    for role in roles_for_concern(concern) {
        let resolved = roles
            .get(*role)
            .map(|idx| dataset.columns()[idx].clone())
            .unwrap_or_else(|| "(not resolved)".to_string());
        table.add_row(vec![Cell::new(role.name()), Cell::new(resolved)]);
    }
    table
}
