use log::debug;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
pub mod cli;
pub mod config;
pub mod error;
pub mod plot;
pub mod run;
pub mod viewer;

pub use error::{PlotError, Result};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// input csv files are looked up in this directory
pub const CSV_DIR: &str = "csvs";
/// written images go to this directory
pub const PLOT_DIR: &str = "plots";
/// width and height of every figure, in pixels
pub const FIGURE_SIZE: (u32, u32) = (640, 480);

pub const USAGE: &str = "general usage: csvplot <csv_file(s)> [--write <png_file(s)>]";

/// One parsed csv file, ready to be plotted.
/// The fields are private, once loaded the record is only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    x: Vec<f64>,
    y: Vec<f64>,
    x_label: String,
    y_label: String,
    title: String,
    source_name: String,
}

impl Record {
    /// x and y are pushed together, so they always have the same length
    pub(crate) fn new(x_label: &str, y_label: &str, x: Vec<f64>, y: Vec<f64>, source_name: &str) -> Record {
        debug_assert_eq!(x.len(), y.len());
        Record {
            x,
            y,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            title: format!("{} vs. {}", x_label, y_label),
            source_name: source_name.to_string(),
        }
    }

    /// Init a Record from the csv file `name` inside `dir`.
    /// The first row gives the x and y labels,
    /// every following row must hold exactly two finite numbers.
    /// Rows are kept in file order, which is the order the line connects them.
    pub fn from_csv(dir: &Path, name: &str) -> Result<Record> {
        let path = dir.join(name);
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PlotError::FileNotFound(name.to_string()),
            _ => PlotError::Io {
                path: path.clone(),
                source: e,
            },
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let mut rows = reader.records();

        let labels = match rows.next() {
            Some(row) => row.map_err(|source| PlotError::Csv {
                file: name.to_string(),
                source,
            })?,
            None => return Err(PlotError::MissingLabels(name.to_string())),
        };
        if labels.len() < 2 {
            return Err(PlotError::MissingLabels(name.to_string()));
        }

        let mut x: Vec<f64> = Vec::new();
        let mut y: Vec<f64> = Vec::new();
        for row in rows {
            let row = row.map_err(|source| PlotError::Csv {
                file: name.to_string(),
                source,
            })?;
            let line = row.position().map_or(0, |p| p.line());
            if row.len() != 2 {
                return Err(PlotError::ColumnCount {
                    file: name.to_string(),
                    line,
                    found: row.len(),
                });
            }
            x.push(parse_number(name, line, &row[0])?);
            y.push(parse_number(name, line, &row[1])?);
        }
        debug!("parsed {} rows from {}", x.len(), path.display());
        Ok(Record::new(&labels[0], &labels[1], x, y, name))
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// the input file name, only used to pick the axis scaling
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// the (x, y) pairs in file order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// signed decimal floats, exponents included; inf and nan are refused
fn parse_number(file: &str, line: u64, field: &str) -> Result<f64> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PlotError::NotNumeric {
            file: file.to_string(),
            line,
            field: field.to_string(),
        }),
    }
}

/// None for an empty slice
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut s_iter = s.iter();
    let (mut min, mut max) = match s_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in s_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn csv_dir(name: &str, content: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(name), content).unwrap();
        dir
    }

    #[test]
    fn loads_labels_title_and_rows_in_order() {
        let dir = csv_dir("test.csv", "time,value\n0,1\n1,2\n2,4\n");
        let record = Record::from_csv(dir.path(), "test.csv").unwrap();
        assert_eq!(record.x_label(), "time");
        assert_eq!(record.y_label(), "value");
        assert_eq!(record.title(), "time vs. value");
        assert_eq!(record.source_name(), "test.csv");
        assert_eq!(record.x(), &[0., 1., 2.]);
        assert_eq!(record.y(), &[1., 2., 4.]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn accepts_signs_decimals_and_exponents() {
        let dir = csv_dir("e.csv", "a,b\n-1.5e3,-3.14e2\n +0.25 ,1E-2\n");
        let record = Record::from_csv(dir.path(), "e.csv").unwrap();
        assert_eq!(record.x(), &[-1500., 0.25]);
        assert_eq!(record.y(), &[-314., 0.01]);
    }

    #[test]
    fn header_only_gives_empty_record() {
        let dir = csv_dir("h.csv", "a,b\n");
        let record = Record::from_csv(dir.path(), "h.csv").unwrap();
        assert!(record.is_empty());
        assert_eq!(record.title(), "a vs. b");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        match Record::from_csv(dir.path(), "nofile.csv") {
            Err(PlotError::FileNotFound(name)) => assert_eq!(name, "nofile.csv"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_one_or_three_columns() {
        let dir = csv_dir("one.csv", "a,b\n1,2\n3\n");
        match Record::from_csv(dir.path(), "one.csv") {
            Err(PlotError::ColumnCount { line, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        let dir = csv_dir("three.csv", "a,b\n1,2,3\n");
        assert!(matches!(
            Record::from_csv(dir.path(), "three.csv"),
            Err(PlotError::ColumnCount { found: 3, .. })
        ));
    }

    #[test]
    fn rejects_text_and_non_finite_values() {
        let dir = csv_dir("t.csv", "a,b\n1,abc\n");
        match Record::from_csv(dir.path(), "t.csv") {
            Err(PlotError::NotNumeric { field, line, .. }) => {
                assert_eq!(field, "abc");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        let dir = csv_dir("n.csv", "a,b\nnan,1\n");
        assert!(matches!(
            Record::from_csv(dir.path(), "n.csv"),
            Err(PlotError::NotNumeric { .. })
        ));
    }

    #[test]
    fn empty_file_or_single_label_has_no_labels() {
        let dir = csv_dir("empty.csv", "");
        assert!(matches!(
            Record::from_csv(dir.path(), "empty.csv"),
            Err(PlotError::MissingLabels(_))
        ));
        let dir = csv_dir("single.csv", "a\n1,2\n");
        assert!(matches!(
            Record::from_csv(dir.path(), "single.csv"),
            Err(PlotError::MissingLabels(_))
        ));
    }

    #[test]
    fn x_and_y_have_one_value_per_row() {
        let content: String = (0..50).map(|i| format!("{},{}\n", i, i * i)).collect();
        let dir = csv_dir("sq.csv", &format!("n,square\n{}", content));
        let record = Record::from_csv(dir.path(), "sq.csv").unwrap();
        assert_eq!(record.x().len(), 50);
        assert_eq!(record.y().len(), 50);
        assert_eq!(record.points().nth(7), Some((7., 49.)));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = csv_dir("blank.csv", "a,b\n1,2\n\n3,4\n\n");
        let record = Record::from_csv(dir.path(), "blank.csv").unwrap();
        assert_eq!(record.x(), &[1., 3.]);
        assert_eq!(record.y(), &[2., 4.]);
        // a line of spaces is not blank, it is a one-field row
        let dir = csv_dir("spaces.csv", "a,b\n1,2\n   \n");
        assert!(matches!(
            Record::from_csv(dir.path(), "spaces.csv"),
            Err(PlotError::ColumnCount { found: 1, .. })
        ));
    }

    #[test]
    fn extra_header_fields_are_ignored() {
        let dir = csv_dir("x.csv", "a,b,c\n1,2\n");
        let record = Record::from_csv(dir.path(), "x.csv").unwrap();
        assert_eq!(record.title(), "a vs. b");
    }

    #[test]
    fn min_and_max_of_slices() {
        assert_eq!(min_and_max(&[3., -1., 2.]), Some((-1., 3.)));
        assert_eq!(min_and_max::<f64>(&[]), None);
    }
}
