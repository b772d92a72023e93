//! Error types for benchviz.
#![allow(missing_docs)]

use plotters::drawing::DrawingAreaErrorKind;
use std::error::Error as StdError;

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain!{
    errors {
        MissingInput(path: String) {
            description("input file not found")
            display("input file not found: {}", path)
        }
        MalformedTable(reason: String) {
            description("malformed table")
            display("malformed table: {}", reason)
        }
        UnknownColumn(name: String) {
            description("column not present in table header")
            display("column '{}' not present in table header", name)
        }
        TypeMismatch(column: String, row: usize, value: String) {
            description("non-numeric value in numeric column")
            display("column '{}', row {}: '{}' is not numeric", column, row, value)
        }
        BaselineNotFound(group: String, degree: String) {
            description("no baseline row in group")
            display("group [{}] has no baseline row at degree {}", group, degree)
        }
        TruncatedSnapshotFile(size: u64, cube_bytes: u64) {
            description("snapshot file is not a whole number of cubes")
            display("snapshot file of {} bytes is not a multiple of {} bytes", size, cube_bytes)
        }
        InvalidSetting(reason: String) {
            description("unusable setting")
            display("invalid setting: {}", reason)
        }
        Render(reason: String) {
            description("error in rendering the chart")
            display("render error: {}", reason)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
    }
}

impl<E: StdError + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::from_kind(ErrorKind::Render(err.to_string()))
    }
}
