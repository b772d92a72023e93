//! Speedup and efficiency of measured runs relative to a baseline run.
//!
//! Rows are partitioned by their configuration (every key except the
//! parallelism degree). Inside a partition the baseline is either the row with
//! the lowest degree or the row at a fixed degree, and
//!
//! ```ignore
//! speedup    = time(baseline) / time(row)
//! efficiency = speedup / degree(row)
//! ```
//!
//! Nothing is clamped: a zero time gives an infinite speedup and it is left to
//! the caller to decide how to show it.

use average::{Estimate, Variance};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use errors::*;
use table::Table;

const DEGREE_EPSILON: f64 = 1e-9;

/// Which row of a partition the speedup is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// The row with the lowest parallelism degree.
    Lowest,

    /// The row at exactly this degree, e.g. 2 processes.
    Fixed(f64),
}

impl Default for Baseline {
    fn default() -> Self {
        Baseline::Lowest
    }
}

impl FromStr for Baseline {
    type Err = String;

    fn from_str(s: &str) -> ::std::result::Result<Baseline, String> {
        match s.trim() {
            "lowest" | "min" => Ok(Baseline::Lowest),
            other => other
                .parse::<f64>()
                .map(Baseline::Fixed)
                .map_err(|_| format!("expected 'lowest' or a degree, got '{}'", other)),
        }
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Baseline::Lowest => write!(f, "lowest"),
            Baseline::Fixed(d) => write!(f, "{}", d),
        }
    }
}

/// The configuration values that identify a partition. Components compare
/// numerically when both parse as numbers, so `"2" < "16"`, and numbers sort
/// before text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    /// A key with a single component.
    pub fn single<S: Into<String>>(s: S) -> Self {
        GroupKey(vec![s.into()])
    }

    /// The key of the single partition of a table that is not grouped.
    pub fn empty() -> Self {
        GroupKey(Vec::new())
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &GroupKey) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let ord = compare_component(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

// Numbers before text, numbers by value; ties fall back to the text so that
// only equal strings compare equal.
fn compare_component(a: &str, b: &str) -> Ordering {
    let number = |s: &str| s.parse::<f64>().ok().filter(|v| !v.is_nan());
    let ord = match (number(a), number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    ord.then_with(|| a.cmp(b))
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &GroupKey) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// One measured run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Configuration, without the degree.
    pub group: GroupKey,

    /// Threads or processes used.
    pub degree: f64,

    /// Measured time, in whatever unit the table uses.
    pub time: f64,
}

impl Measurement {
    /// Creates a new `Measurement`.
    pub fn new(group: GroupKey, degree: f64, time: f64) -> Self {
        Measurement {
            group: group,
            degree: degree,
            time: time,
        }
    }
}

/// A measurement together with its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// Configuration, without the degree.
    pub group: GroupKey,

    /// Threads or processes used.
    pub degree: f64,

    /// Measured time.
    pub time: f64,

    /// Baseline time over this time.
    pub speedup: f64,

    /// Speedup over degree.
    pub efficiency: f64,
}

/// Mean and spread of repeated trials of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Configuration, without the degree.
    pub group: GroupKey,

    /// Threads or processes used.
    pub degree: f64,

    /// Mean time over the trials.
    pub mean: f64,

    /// Sample standard deviation over the trials (0 for a single trial).
    pub std: f64,

    /// Number of trials.
    pub trials: usize,
}

impl Summary {
    /// The mean as a single measurement, ready for derivation.
    pub fn as_measurement(&self) -> Measurement {
        Measurement::new(self.group.clone(), self.degree, self.mean)
    }
}

fn by_group_then_degree(a: &Measurement, b: &Measurement) -> Ordering {
    a.group
        .cmp(&b.group)
        .then_with(|| a.degree.partial_cmp(&b.degree).unwrap_or(Ordering::Equal))
}

/// Collapses repeated trials that share configuration and degree. Output is
/// ordered by group, then degree.
pub fn summarize(measurements: &[Measurement]) -> Vec<Summary> {
    let mut sorted = measurements.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| by_group_then_degree(a, b));

    sorted
        .into_iter()
        .group_by(|m| (m.group.clone(), m.degree.to_bits()))
        .into_iter()
        .map(|((group, bits), trials)| {
            let mut var = Variance::new();
            let mut n = 0;
            for m in trials {
                var.add(m.time);
                n += 1;
            }
            Summary {
                group: group,
                degree: f64::from_bits(bits),
                mean: var.mean(),
                std: var.sample_variance().sqrt(),
                trials: n,
            }
        })
        .collect()
}

/// Derives speedup and efficiency for every measurement. A partition without
/// a baseline row aborts the whole derivation.
pub fn derive(measurements: &[Measurement], baseline: Baseline) -> Result<Vec<Derived>> {
    Ok(derive_indexed(measurements, baseline, false)?
        .into_iter()
        .map(|(_, d)| d)
        .collect())
}

// Returns (input position, derived) pairs ordered by group, then degree.
// Rows at the same degree keep their input order; the first is the baseline.
fn derive_indexed(
    measurements: &[Measurement],
    baseline: Baseline,
    skip_missing: bool,
) -> Result<Vec<(usize, Derived)>> {
    let mut order = (0..measurements.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| by_group_then_degree(&measurements[a], &measurements[b]));

    let mut out = Vec::with_capacity(measurements.len());
    for (group, rows) in &order.into_iter().group_by(|&i| measurements[i].group.clone()) {
        let rows = rows.collect::<Vec<usize>>();
        let base = match baseline {
            Baseline::Lowest => rows.first().cloned(),
            Baseline::Fixed(d) => rows.iter()
                .cloned()
                .find(|&i| (measurements[i].degree - d).abs() < DEGREE_EPSILON),
        };
        let base = match base {
            Some(i) => &measurements[i],
            None if skip_missing => {
                warn!("skipping group [{}]: no row at degree {}", group, baseline);
                continue;
            }
            None => bail!(ErrorKind::BaselineNotFound(group.to_string(), baseline.to_string())),
        };
        debug!(
            "group [{}]: {} rows, baseline degree {} time {}",
            group,
            rows.len(),
            base.degree,
            base.time
        );

        for i in rows {
            let m = &measurements[i];
            let speedup = base.time / m.time;
            out.push((
                i,
                Derived {
                    group: m.group.clone(),
                    degree: m.degree,
                    time: m.time,
                    speedup: speedup,
                    efficiency: speedup / m.degree,
                },
            ));
        }
    }
    Ok(out)
}

/// Table-level derivation: which columns hold the configuration, the degree
/// and the time, and how the baseline is chosen.
#[derive(Debug, Clone)]
pub struct Derivation {
    group_by: Vec<String>,
    degree: String,
    time: String,
    baseline: Baseline,
    skip_missing: bool,
}

impl Derivation {
    /// Derivation over `degree` and `time` columns with a single partition
    /// and the lowest degree as baseline.
    pub fn new(degree: &str, time: &str) -> Self {
        Derivation {
            group_by: Vec::new(),
            degree: degree.to_string(),
            time: time.to_string(),
            baseline: Baseline::Lowest,
            skip_missing: false,
        }
    }

    /// Partitions rows by these columns.
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Sets the baseline rule.
    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Skips partitions without a baseline row (with a warning) instead of
    /// failing.
    pub fn skip_missing_baseline(mut self, skip: bool) -> Self {
        self.skip_missing = skip;
        self
    }

    /// Extracts the measurements of `table`, in row order.
    pub fn measurements(&self, table: &Table) -> Result<Vec<Measurement>> {
        let degrees = table.numeric(&self.degree)?;
        let times = table.numeric(&self.time)?;
        let keys = self.group_by
            .iter()
            .map(|c| table.text(c))
            .collect::<Result<Vec<_>>>()?;

        Ok(degrees
            .into_iter()
            .zip(times)
            .enumerate()
            .map(|(row, (degree, time))| {
                let group = keys.iter().map(|col| col[row].to_string()).collect();
                Measurement::new(GroupKey(group), degree, time)
            })
            .collect())
    }

    /// Mean and spread of repeated trials, ordered by group, then degree.
    pub fn summarize(&self, table: &Table) -> Result<Vec<Summary>> {
        Ok(summarize(&self.measurements(table)?))
    }

    /// Derived metrics ordered by group, then degree.
    pub fn derive(&self, table: &Table) -> Result<Vec<Derived>> {
        let measurements = self.measurements(table)?;
        let derived = derive_indexed(&measurements, self.baseline, self.skip_missing)?;
        Ok(derived.into_iter().map(|(_, d)| d).collect())
    }

    /// Averages repeated trials first, then derives on the means.
    pub fn derive_mean(&self, table: &Table) -> Result<Vec<Derived>> {
        let means = summarize(&self.measurements(table)?)
            .iter()
            .map(|s| s.as_measurement())
            .collect::<Vec<_>>();
        let derived = derive_indexed(&means, self.baseline, self.skip_missing)?;
        Ok(derived.into_iter().map(|(_, d)| d).collect())
    }

    /// Copy of `table` with `speedup` and `efficiency` columns appended, rows
    /// in their original order. Rows of skipped partitions get NaN.
    pub fn augment(&self, table: &Table) -> Result<Table> {
        let measurements = self.measurements(table)?;
        let mut speedup = vec![::std::f64::NAN; measurements.len()];
        let mut efficiency = vec![::std::f64::NAN; measurements.len()];
        for (i, d) in derive_indexed(&measurements, self.baseline, self.skip_missing)? {
            speedup[i] = d.speedup;
            efficiency[i] = d.efficiency;
        }
        table
            .with_column("speedup", &speedup)?
            .with_column("efficiency", &efficiency)
    }
}
