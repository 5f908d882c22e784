use log::warn;
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::dash::*;

/// The position of each column of a CSV file, found from its header row.
pub struct Columns {
    path: String,
    positions: HashMap<String, usize>,
}

impl Columns {
    pub fn new(path: &str, headers: &csv::StringRecord) -> Columns {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            // The first occurrence wins when a header is repeated.
            positions.entry(name.to_string()).or_insert(idx);
        }
        Columns {
            path: path.to_string(),
            positions,
        }
    }

    pub fn required(&self, column: &str) -> DashResult<usize> {
        self.positions
            .get(column)
            .cloned()
            .context(MissingColumnSnafu {
                column,
                path: self.path.as_str(),
            })
    }

    pub fn optional(&self, column: &str) -> Option<usize> {
        self.positions.get(column).cloned()
    }

    pub fn cell(&self, line: &csv::StringRecord, idx: usize, lineno: usize) -> DashResult<String> {
        line.get(idx).map(|s| s.to_string()).context(CsvLineTooShortSnafu {
            path: self.path.as_str(),
            lineno,
        })
    }

    /// The content of an optional column, empty when the file does not have it.
    pub fn optional_cell(
        &self,
        line: &csv::StringRecord,
        idx: Option<usize>,
        lineno: usize,
    ) -> DashResult<String> {
        match idx {
            Some(idx) => self.cell(line, idx, lineno),
            None => Ok(String::new()),
        }
    }

    /// A count of voters. Surrounding spaces are allowed and whole decimals such as
    /// `1234.0` are accepted. Anything else (empty cells, `NA`, negative or fractional
    /// numbers) counts as zero.
    pub fn count_cell(
        &self,
        line: &csv::StringRecord,
        idx: usize,
        column: &str,
        lineno: usize,
    ) -> DashResult<u64> {
        let content = self.cell(line, idx, lineno)?;
        let count = parse_count(&content);
        if count.is_none() {
            warn!(
                "{}: line {}: {} is not a count: {:?}, counted as 0",
                simplify_file_name(&self.path),
                lineno,
                column,
                content
            );
        }
        Ok(count.unwrap_or(0))
    }
}

fn parse_count(content: &str) -> Option<u64> {
    let trimmed = content.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 => {
            Some(x as u64)
        }
        _ => None,
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Resolves a path from the config file against the directory of the config file.
pub fn resolve_path(root: &Path, path: &str) -> String {
    root.join(path).display().to_string()
}

/// The name of an export file, built from the selected state.
///
/// Path separators in the state would escape the export directory, they are replaced.
pub fn export_file_name(state: &str, suffix: &str) -> String {
    let cleaned: String = state
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_{}.csv", cleaned, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Columns {
        let headers = csv::StringRecord::from(vec!["State", "PC No", "Male", "State"]);
        Columns::new("test.csv", &headers)
    }

    #[test]
    fn finds_columns_by_name() {
        let cols = columns();
        assert_eq!(cols.required("PC No").unwrap(), 1);
        assert_eq!(cols.required("State").unwrap(), 0);
        assert_eq!(cols.optional("Gender"), None);
    }

    #[test]
    fn missing_column_names_the_file() {
        let err = columns().required("Total Votes").unwrap_err();
        assert!(matches!(err, DashError::MissingColumn { .. }));
        let msg = err.to_string();
        assert!(msg.contains("Total Votes"), "{}", msg);
        assert!(msg.contains("test.csv"), "{}", msg);
    }

    #[test]
    fn cells() {
        let cols = columns();
        let line = csv::StringRecord::from(vec!["Goa", "1", " 42 "]);
        assert_eq!(cols.cell(&line, 0, 2).unwrap(), "Goa");
        assert_eq!(cols.optional_cell(&line, None, 2).unwrap(), "");
        assert_eq!(cols.count_cell(&line, 2, "Male", 2).unwrap(), 42);
        assert!(matches!(
            cols.cell(&line, 3, 2),
            Err(DashError::CsvLineTooShort { lineno: 2, .. })
        ));
    }

    #[test]
    fn unreadable_counts_are_zero() {
        let cols = columns();
        let line = csv::StringRecord::from(vec!["Goa", "", "NA", "1234.0", "-3", "2.5"]);
        assert_eq!(cols.count_cell(&line, 0, "State", 2).unwrap(), 0);
        assert_eq!(cols.count_cell(&line, 1, "Male", 2).unwrap(), 0);
        assert_eq!(cols.count_cell(&line, 2, "Male", 2).unwrap(), 0);
        assert_eq!(cols.count_cell(&line, 3, "Male", 2).unwrap(), 1234);
        assert_eq!(cols.count_cell(&line, 4, "Male", 2).unwrap(), 0);
        assert_eq!(cols.count_cell(&line, 5, "Male", 2).unwrap(), 0);
        assert!(matches!(
            cols.count_cell(&line, 6, "Male", 2),
            Err(DashError::CsvLineTooShort { lineno: 2, .. })
        ));
    }

    #[test]
    fn export_names() {
        assert_eq!(
            export_file_name("Kerala", "election_results"),
            "Kerala_election_results.csv"
        );
        assert_eq!(
            export_file_name("Dadra & Nagar Haveli/Daman & Diu", "voter_data"),
            "Dadra & Nagar Haveli_Daman & Diu_voter_data.csv"
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/STATE2.csv"), "STATE2.csv");
        assert_eq!(
            resolve_path(Path::new("/data"), "STATE2.csv"),
            "/data/STATE2.csv"
        );
        assert_eq!(
            resolve_path(Path::new("/data"), "/other/STATE2.csv"),
            "/other/STATE2.csv"
        );
    }
}
