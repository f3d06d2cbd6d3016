use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{Result, SnapError};
use crate::holdings::AllocationEntry;

const PALETTE: &[RGBColor] = &[
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(158, 157, 36),
];

/// Render the allocation pie. Callers skip this artifact entirely when the
/// allocation is empty or worthless; slices here are assumed non-negative
/// with a positive total.
pub fn render_allocation_pie(path: &Path, allocation: &[AllocationEntry]) -> Result<()> {
    let root = BitMapBackend::new(path, (640, 640)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| SnapError::Chart(e.to_string()))?;
    let root = root
        .titled("Portfolio Allocation by Asset Class", ("sans-serif", 28))
        .map_err(|e| SnapError::Chart(e.to_string()))?;

    let sizes: Vec<f64> = allocation.iter().map(|a| a.market_value).collect();
    let labels: Vec<String> = allocation.iter().map(|a| a.asset_class.clone()).collect();
    let colors: Vec<RGBColor> = (0..allocation.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let center = (320, 330);
    let radius = 220.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    root.draw(&pie).map_err(|e| SnapError::Chart(e.to_string()))?;

    root.present().map_err(|e| SnapError::Chart(e.to_string()))?;
    info!(path = %path.display(), "allocation chart written");
    Ok(())
}

/// Render the observed income vs expense bars. Absent totals arrive as 0.
pub fn render_income_expense_bars(path: &Path, income: f64, expense: f64) -> Result<()> {
    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| SnapError::Chart(e.to_string()))?;

    let y_max = income.max(expense).max(1.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Income vs Expense (observed period)", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..2.0, 0.0..y_max)
        .map_err(|e| SnapError::Chart(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2)
        .x_label_formatter(&|x| {
            if *x < 1.0 {
                "Income".to_string()
            } else {
                "Expense".to_string()
            }
        })
        .y_desc("Amount")
        .draw()
        .map_err(|e| SnapError::Chart(e.to_string()))?;

    chart
        .draw_series([
            Rectangle::new([(0.25, 0.0), (0.75, income)], GREEN.filled()),
            Rectangle::new([(1.25, 0.0), (1.75, expense)], RED.filled()),
        ])
        .map_err(|e| SnapError::Chart(e.to_string()))?;

    root.present().map_err(|e| SnapError::Chart(e.to_string()))?;
    info!(path = %path.display(), "income/expense chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation() -> Vec<AllocationEntry> {
        vec![
            AllocationEntry { asset_class: "Equity".into(), market_value: 700.0, pct: 70.0 },
            AllocationEntry { asset_class: "Bond".into(), market_value: 300.0, pct: 30.0 },
        ]
    }

    #[test]
    fn test_pie_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alloc.png");
        render_allocation_pie(&path, &allocation()).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_bars_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.png");
        render_income_expense_bars(&path, 2000.0, 800.0).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_bars_handle_zero_totals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.png");
        render_income_expense_bars(&path, 0.0, 0.0).unwrap();
        assert!(path.exists());
    }
}
