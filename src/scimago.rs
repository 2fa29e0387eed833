//! SCImago journal-rankings table.
//!
//! Loads the SCImago dataset (semicolon-delimited CSV) once at process
//! start into an in-memory map keyed by lower-cased journal title, then
//! serves read-only lookups for the lifetime of the process.

use crate::error::{Result, SotagenError};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Sentinel for a journal missing from the table
pub const QUARTILE_NOT_FOUND: &str = "No encontrado";

/// Sentinel for fields with no data
pub const NOT_AVAILABLE: &str = "No disponible";

/// Ranking metadata for one journal
#[derive(Debug, Clone, Serialize)]
pub struct JournalRecord {
    /// SCImago quartile (Q1-Q4), or a sentinel
    pub quartile: String,
    pub country: String,
    pub subject_area: String,
    pub subject_category: String,
}

impl JournalRecord {
    /// Record returned when the journal has no entry in the table
    pub fn not_found() -> Self {
        Self {
            quartile: QUARTILE_NOT_FOUND.to_string(),
            country: NOT_AVAILABLE.to_string(),
            subject_area: NOT_AVAILABLE.to_string(),
            subject_category: NOT_AVAILABLE.to_string(),
        }
    }
}

/// In-memory SCImago lookup table.
///
/// Built once from the CSV and never mutated afterwards, so it is safe to
/// share behind an `Arc` across concurrent requests.
pub struct ScimagoTable {
    records: HashMap<String, JournalRecord>,
}

impl ScimagoTable {
    /// Load the table from a semicolon-delimited CSV file.
    ///
    /// Requires columns `Title`, `Quartile`, `Country`, `Areas` and
    /// `Categories`. Rows that fail to parse or are missing fields are
    /// skipped, matching the tolerant load of the source dataset.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let col = |name: &str| headers.iter().position(|h| h == name);

        let title_idx = col("Title")
            .ok_or_else(|| SotagenError::Config("SCImago CSV missing 'Title' column".into()))?;
        let quartile_idx = col("Quartile")
            .ok_or_else(|| SotagenError::Config("SCImago CSV missing 'Quartile' column".into()))?;
        let country_idx = col("Country");
        let areas_idx = col("Areas");
        let categories_idx = col("Categories");

        let mut records = HashMap::new();
        let mut skipped = 0usize;

        for row in reader.records() {
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    debug!(error = %e, "Skipping malformed SCImago row");
                    skipped += 1;
                    continue;
                }
            };

            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string()
            };

            let title = match row.get(title_idx).map(str::trim) {
                Some(t) if !t.is_empty() => t.to_lowercase(),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let record = JournalRecord {
                quartile: field(Some(quartile_idx)),
                country: field(country_idx),
                subject_area: field(areas_idx),
                subject_category: field(categories_idx),
            };

            // First occurrence wins, matching row-order lookup on the source table
            records.entry(title).or_insert(record);
        }

        if skipped > 0 {
            warn!(skipped, "Skipped unusable SCImago rows");
        }
        info!(journals = records.len(), path = %path.display(), "Loaded SCImago table");

        Ok(Self { records })
    }

    /// Build a table directly from records (tests)
    #[cfg(test)]
    pub fn from_records(records: HashMap<String, JournalRecord>) -> Self {
        Self { records }
    }

    /// Number of journals in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a journal by title, case-insensitively.
    ///
    /// Exact match only; unknown journals get the "No encontrado" record.
    /// Never fails.
    pub fn lookup(&self, journal_name: &str) -> JournalRecord {
        let key = journal_name.trim().to_lowercase();
        match self.records.get(&key) {
            Some(record) => record.clone(),
            None => {
                debug!(journal = journal_name, "Journal not in SCImago table");
                JournalRecord::not_found()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> ScimagoTable {
        let mut records = HashMap::new();
        records.insert(
            "cell".to_string(),
            JournalRecord {
                quartile: "Q1".to_string(),
                country: "United States".to_string(),
                subject_area: "Biochemistry, Genetics and Molecular Biology".to_string(),
                subject_category: "Cell Biology (Q1)".to_string(),
            },
        );
        ScimagoTable::from_records(records)
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let table = sample_table();
        assert_eq!(table.lookup("CELL").quartile, "Q1");
        assert_eq!(table.lookup("Cell").quartile, "Q1");
        assert_eq!(table.lookup("  cell ").quartile, "Q1");
    }

    #[test]
    fn test_lookup_unknown_journal() {
        let table = sample_table();
        let record = table.lookup("Journal of Nonexistent Results");
        assert_eq!(record.quartile, QUARTILE_NOT_FOUND);
        assert_eq!(record.country, NOT_AVAILABLE);
        assert_eq!(record.subject_area, NOT_AVAILABLE);
        assert_eq!(record.subject_category, NOT_AVAILABLE);
    }

    #[test]
    fn test_load_from_csv() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Rank;Title;Quartile;Country;Areas;Categories").expect("write");
        writeln!(
            file,
            "1;Cell;Q1;United States;Molecular Biology;Cell Biology (Q1)"
        )
        .expect("write");
        writeln!(file, "2;;Q2;Spain;Ecology;Ecology (Q2)").expect("write");
        writeln!(file, "3;The Lancet;Q1;United Kingdom;Medicine;Medicine (Q1)").expect("write");

        let table = ScimagoTable::load(file.path()).expect("load");
        // Row with empty title was skipped
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("the lancet").country, "United Kingdom");
    }

    #[test]
    fn test_load_missing_required_column() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Name;Rank").expect("write");
        writeln!(file, "Cell;1").expect("write");

        assert!(ScimagoTable::load(file.path()).is_err());
    }

    #[test]
    fn test_short_rows_get_placeholder_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Title;Quartile;Country;Areas;Categories").expect("write");
        writeln!(file, "Minimal Journal;Q3").expect("write");

        let table = ScimagoTable::load(file.path()).expect("load");
        let record = table.lookup("Minimal Journal");
        assert_eq!(record.quartile, "Q3");
        assert_eq!(record.country, NOT_AVAILABLE);
    }
}
