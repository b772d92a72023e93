//! Loader for delimited benchmark tables.
//!
//! A table is a header row followed by data rows of the same width. Cells are
//! kept as text; numeric views are produced on demand so that a stray label in
//! a timing column is reported against its row instead of being dropped.
//!
//! ```ignore
//! Number of Process,Size,Execution,Time (s)
//! 2,512 x 512,1,0.000136
//! 2,512 x 512,2,0.000137
//! ```

use csv;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use errors::*;

/// A rectangular table of text cells with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Loads a comma-separated table with a header row from `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path)
            .chain_err(|| ErrorKind::MissingInput(path.display().to_string()))?;
        let table = Table::from_reader(file)?;
        info!(
            "loaded {:?}: {} rows, {} columns",
            path,
            table.len(),
            table.headers.len()
        );
        Ok(table)
    }

    /// Parses a table embedded in the program, e.g. a reference data set.
    pub fn from_literal(text: &str) -> Result<Table> {
        Table::from_reader(text.as_bytes())
    }

    /// Reads a comma-separated table with a header row from any reader.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader
            .headers()
            .map_err(structural)?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        check_header(&headers)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(structural)?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Table {
            headers: headers,
            rows: rows,
        })
    }

    /// Builds a table from already split cells. Every row must match the
    /// header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Table> {
        check_header(&headers)?;
        if let Some((i, r)) = rows.iter().enumerate().find(|&(_, r)| r.len() != headers.len()) {
            bail!(ErrorKind::MalformedTable(format!(
                "row {} has {} fields, header has {}",
                i + 1,
                r.len(),
                headers.len()
            )));
        }
        Ok(Table {
            headers: headers,
            rows: rows,
        })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has a header but no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ErrorKind::UnknownColumn(name.to_string()).into())
    }

    /// Cell at (`row`, `name`).
    pub fn cell(&self, row: usize, name: &str) -> Result<&str> {
        let col = self.column_index(name)?;
        self.rows
            .get(row)
            .map(|r| r[col].as_str())
            .ok_or_else(|| ErrorKind::MalformedTable(format!("no row {}", row)).into())
    }

    /// Text cells of a column.
    pub fn text(&self, name: &str) -> Result<Vec<&str>> {
        let col = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[col].as_str()).collect())
    }

    /// Numeric view of a column. Fails on the first cell that is not a number.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r[col].parse::<f64>().map_err(|_| {
                    Error::from(ErrorKind::TypeMismatch(name.to_string(), i + 1, r[col].clone()))
                })
            })
            .collect()
    }

    /// Reduces cells such as `"512 x 512"` to their leading integer.
    pub fn leading_integer(&self, name: &str) -> Result<Vec<u64>> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                leading_integer(&r[col]).ok_or_else(|| {
                    Error::from(ErrorKind::TypeMismatch(name.to_string(), i + 1, r[col].clone()))
                })
            })
            .collect()
    }

    /// Replaces a column by the leading integer of each of its cells.
    pub fn reduce_to_leading_integer(&self, name: &str) -> Result<Table> {
        let col = self.column_index(name)?;
        let values = self.leading_integer(name)?;
        let mut table = self.clone();
        for (row, v) in table.rows.iter_mut().zip(values) {
            row[col] = v.to_string();
        }
        Ok(table)
    }

    /// Rows for which `keep` holds, given the row's cells by column name.
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        let rows = self.rows
            .iter()
            .filter(|r| {
                keep(&Row {
                    headers: &self.headers,
                    cells: r,
                })
            })
            .cloned()
            .collect();
        Table {
            headers: self.headers.clone(),
            rows: rows,
        }
    }

    /// Rows whose cell in column `name` equals `value`.
    pub fn filter_eq(&self, name: &str, value: &str) -> Result<Table> {
        let col = self.column_index(name)?;
        Ok(self.filter(|r| r.cells[col] == value))
    }

    /// Appends a column computed elsewhere; `values` must have one entry per
    /// row.
    pub fn with_column(&self, name: &str, values: &[f64]) -> Result<Table> {
        if values.len() != self.rows.len() {
            bail!(ErrorKind::MalformedTable(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        let mut table = self.clone();
        table.headers.push(name.to_string());
        for (row, v) in table.rows.iter_mut().zip(values) {
            row.push(v.to_string());
        }
        Ok(table)
    }
}

/// A borrowed view of one table row.
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell of column `name`, if the column exists.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.cells[i].as_str())
    }

    /// Numeric cell of column `name`, if present and parseable.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|c| c.parse().ok())
    }
}

fn structural(err: csv::Error) -> Error {
    let reason = match *err.kind() {
        csv::ErrorKind::UnequalLengths {
            ref pos,
            expected_len,
            len,
        } => Some(format!(
            "line {} has {} fields, header has {}",
            pos.as_ref().map(|p| p.line()).unwrap_or(0),
            len,
            expected_len
        )),
        _ => None,
    };
    match reason {
        Some(reason) => ErrorKind::MalformedTable(reason).into(),
        None => err.into(),
    }
}

// A header is missing when the first line is empty or already holds data.
fn check_header(headers: &[String]) -> Result<()> {
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!(ErrorKind::MalformedTable("empty header row".to_string()));
    }
    if let Some(h) = headers.iter().find(|h| h.is_empty() || h.parse::<f64>().is_ok()) {
        bail!(ErrorKind::MalformedTable(
            format!("header row missing ('{}' is not a column name)", h),
        ));
    }
    Ok(())
}

fn leading_integer(cell: &str) -> Option<u64> {
    let digits = cell.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();
    digits.parse().ok()
}
