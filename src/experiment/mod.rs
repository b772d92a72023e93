//! Chart jobs, one per benchmark experiment.
//!
//! Every job turns its input table into a list of [`Plot`](struct.Plot.html)s
//! without drawing anything, so the figures can be inspected before they are
//! written with [`save_all`](fn.save_all.html).

use itertools::Itertools;
use std::fs;
use std::path::Path;

use errors::*;
use render::{BarSeries, Figure, Series};
use scaling::{Derived, GroupKey, Measurement, Summary, summarize};
use setting::FigureSetting;
use table::Table;

pub mod affinity;
pub mod bound;
pub mod collective;
pub mod pi;
pub mod pingpong;
pub mod pipeline;
pub mod primes;
pub mod scalability;
pub mod schedule;

/// A figure and the file name it is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    /// File name, relative to the output directory.
    pub file_name: String,

    /// What to draw.
    pub figure: Figure,
}

impl Plot {
    /// Creates a new `Plot`.
    pub fn new<S: Into<String>>(file_name: S, figure: Figure) -> Self {
        Plot {
            file_name: file_name.into(),
            figure: figure,
        }
    }
}

/// Writes every plot into `dir`, creating it if needed.
pub fn save_all(plots: &[Plot], dir: &Path, setting: &FigureSetting) -> Result<()> {
    fs::create_dir_all(dir).chain_err(|| format!("cannot create output directory {:?}", dir))?;
    for plot in plots {
        plot.figure.save(dir.join(&plot.file_name), setting)?;
    }
    Ok(())
}

/// Points of a column pair, in row order.
pub fn column_points(table: &Table, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xs = table.numeric(x)?;
    let ys = table.numeric(y)?;
    Ok(xs.into_iter().zip(ys).collect())
}

/// One series per group of `derived` (already ordered by group, then
/// degree), plotting `value` against the degree.
pub fn derived_series<V, N>(derived: &[Derived], value: V, name: N) -> Vec<Series>
where
    V: Fn(&Derived) -> f64,
    N: Fn(&GroupKey) -> String,
{
    derived
        .iter()
        .group_by(|d| d.group.clone())
        .into_iter()
        .map(|(group, rows)| {
            Series::new(name(&group), rows.map(|d| (d.degree, value(d))).collect())
        })
        .collect()
}

/// One series per group of `summaries` (ordered by group, then degree),
/// plotting the mean time against the degree.
pub fn mean_series<N>(summaries: &[Summary], name: N) -> Vec<Series>
where
    N: Fn(&GroupKey) -> String,
{
    summaries
        .iter()
        .group_by(|s| s.group.clone())
        .into_iter()
        .map(|(group, rows)| Series::new(name(&group), rows.map(|s| (s.degree, s.mean)).collect()))
        .collect()
}

/// Distinct values of a column ordered like group keys (numbers
/// numerically).
pub fn distinct(table: &Table, column: &str) -> Result<Vec<String>> {
    let mut values = table
        .text(column)?
        .into_iter()
        .map(|v| GroupKey::single(v))
        .collect::<Vec<_>>();
    values.sort();
    values.dedup();
    Ok(values.into_iter().map(|k| k.0.into_iter().next().unwrap_or_default()).collect())
}

/// Distinct values of a column in order of first appearance.
pub fn first_seen(table: &Table, column: &str) -> Result<Vec<String>> {
    Ok(table
        .text(column)?
        .into_iter()
        .unique()
        .map(|v| v.to_string())
        .collect())
}

/// Mean of `value` over the rows of each category, in the order of
/// `categories`; `None` where a category has no rows.
pub fn bar_means(
    table: &Table,
    category: &str,
    value: &str,
    categories: &[String],
) -> Result<Vec<Option<f64>>> {
    let keys = table.text(category)?;
    let values = table.numeric(value)?;
    let rows = keys.into_iter()
        .zip(values)
        .map(|(k, v)| Measurement::new(GroupKey::single(k), 0.0, v))
        .collect::<Vec<_>>();
    let means = summarize(&rows);
    Ok(categories
        .iter()
        .map(|c| {
            means
                .iter()
                .find(|s| s.group.0[0] == *c)
                .map(|s| s.mean)
        })
        .collect())
}

/// Categories of `category` and one bar series per distinct `hue` value,
/// each bar the mean of `value`. Series are named by `name`.
pub fn grouped_bars<N>(
    table: &Table,
    category: &str,
    hue: &str,
    value: &str,
    name: N,
) -> Result<(Vec<String>, Vec<BarSeries>)>
where
    N: Fn(&str) -> String,
{
    let categories = distinct(table, category)?;
    let mut series = Vec::new();
    for h in distinct(table, hue)? {
        let subset = table.filter_eq(hue, &h)?;
        series.push(BarSeries {
            name: name(&h),
            values: bar_means(&subset, category, value, &categories)?,
        });
    }
    Ok((categories, series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaling::{Baseline, Measurement, derive};

    #[test]
    fn one_series_per_group() {
        let rows = vec![
            Measurement::new(GroupKey::single("b"), 1.0, 4.0),
            Measurement::new(GroupKey::single("a"), 2.0, 1.0),
            Measurement::new(GroupKey::single("a"), 1.0, 2.0),
        ];
        let derived = derive(&rows, Baseline::Lowest).unwrap();
        let series = derived_series(&derived, |d| d.speedup, |g| format!("bind={}", g));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "bind=a");
        assert_eq!(series[0].points, vec![(1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(series[1].points, vec![(1.0, 1.0)]);
    }

    #[test]
    fn distinct_values_sort_numerically() {
        let t = Table::from_literal("np\n16\n2\n4\n2\n").unwrap();
        assert_eq!(distinct(&t, "np").unwrap(), vec!["2", "4", "16"]);
        assert_eq!(first_seen(&t, "np").unwrap(), vec!["16", "2", "4"]);
    }

    #[test]
    fn bars_are_means_per_category_and_hue() {
        let t = Table::from_literal(
            "chunk_size,collapse,time_seconds\n1,1,2.0\n1,1,4.0\n8,1,1.0\n1,2,5.0\n",
        ).unwrap();
        let (categories, series) =
            grouped_bars(&t, "chunk_size", "collapse", "time_seconds", |c| format!("Collapse {}", c))
                .unwrap();
        assert_eq!(categories, vec!["1", "8"]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Collapse 1");
        assert_eq!(series[0].values, vec![Some(3.0), Some(1.0)]);
        assert_eq!(series[1].values, vec![Some(5.0), None]);
    }
}
