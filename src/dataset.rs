use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{Result, SnapError};

/// Column label carrying the subject identifier in the export convention.
pub const USER_ID_COLUMN: &str = "profile__user_id";

/// An immutable, in-memory copy of one tabular export. Column labels are
/// trimmed and unique; cells stay raw strings until an aggregator
/// interprets them.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from parts, enforcing the label invariants.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let columns: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();
        if columns.is_empty() {
            return Err(SnapError::DataSource("no columns in source".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(SnapError::DataSource(format!("duplicate column label: {c}")));
            }
        }
        // Ragged rows are padded/truncated to the header width.
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }
}

/// Load a CSV export, trim column labels, and optionally filter rows to one
/// subject. A missing subject column is non-fatal: the full dataset is used
/// and the skipped filter is logged.
pub fn load_dataset(path: &Path, subject: Option<&str>) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .map_err(|e| SnapError::DataSource(format!("cannot open {}: {e}", path.display())))?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr
        .headers()
        .map_err(|e| SnapError::DataSource(format!("cannot read header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record =
            record.map_err(|e| SnapError::DataSource(format!("malformed record: {e}")))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    let mut dataset = Dataset::from_parts(headers, rows)?;

    if let Some(id) = subject {
        match dataset.column_index(USER_ID_COLUMN) {
            Some(idx) => {
                let before = dataset.rows.len();
                dataset.rows.retain(|r| r[idx] == id);
                info!(
                    subject = id,
                    kept = dataset.rows.len(),
                    dropped = before - dataset.rows.len(),
                    "filtered dataset to subject"
                );
            }
            None => {
                warn!(
                    subject = id,
                    "no {USER_ID_COLUMN} column; subject filter skipped, using all rows"
                );
            }
        }
    }

    info!(
        rows = dataset.row_count(),
        columns = dataset.columns.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell coercion helpers
// ---------------------------------------------------------------------------

/// Coerce a raw cell to a number. Strips currency symbols, thousands
/// separators and quotes, and reads parenthesized values as negatives.
/// Anything unparseable coerces to 0.
pub fn coerce_numeric(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

/// Parse a raw cell as a date, accepting ISO and US slash forms.
/// Unparseable cells become None and drop out of span computations.
pub fn coerce_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Profile extraction
// ---------------------------------------------------------------------------

/// Client profile attributes: the first non-empty value observed per
/// `profile__*` column. Lookups degrade to "Unknown".
#[derive(Debug, Clone, Default)]
pub struct Profile {
    values: BTreeMap<String, String>,
}

impl Profile {
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("Unknown")
    }
}

pub fn extract_profile(dataset: &Dataset) -> Profile {
    let mut values = BTreeMap::new();
    for (idx, label) in dataset.columns().iter().enumerate() {
        if !label.starts_with("profile__") {
            continue;
        }
        if let Some(row) = dataset.rows().iter().find(|r| !r[idx].trim().is_empty()) {
            values.insert(label.clone(), row[idx].trim().to_string());
        }
    }
    Profile { values }
}
