//! Prime counting: sequential loop against the parallel reduction.

use errors::*;
use experiment::{Plot, bar_means, distinct, grouped_bars, mean_series};
use render::{Axis, BarChart, BarSeries, Figure, LineChart, Panel};
use scaling::Derivation;
use table::{Row, Table};

/// Upper bound of the search.
pub const N: &str = "n";
/// Thread count column.
pub const THREADS: &str = "threads";
/// `sequential` or `parallel_reduction`.
pub const VERSION: &str = "version";
/// Wall time column.
pub const TIME: &str = "time_seconds";

const SEQUENTIAL: &str = "sequential";
const PARALLEL: &str = "parallel_reduction";

/// Four charts over `results.csv`. Repeated rows are averaged.
pub fn plots(table: &Table) -> Result<Vec<Plot>> {
    let sequential = table.filter(|r| is_run(r, SEQUENTIAL, 2.0));
    let seq_means = Derivation::new(N, TIME).summarize(&sequential)?;
    let seq_chart = LineChart::new(
        "Sequential version: time vs n",
        Axis::log("n"),
        Axis::log("Time (s)"),
    ).with_all_series(mean_series(&seq_means, |_| "Sequential".to_string()));

    let parallel = table.filter_eq(VERSION, PARALLEL)?;
    let par_means = Derivation::new(N, TIME).group_by(&[THREADS]).summarize(&parallel)?;
    let par_chart = LineChart::new(
        "Parallel version with reduction: time vs n",
        Axis::log("n"),
        Axis::log("Time (s)"),
    ).with_all_series(mean_series(&par_means, |g| format!("{} threads", g)));

    let compared = table.filter(|r| r.get(VERSION).map_or(false, |v| v == SEQUENTIAL || v == PARALLEL));
    let (categories, series) = grouped_bars(&compared, N, THREADS, TIME, |t| format!("{} threads", t))?;
    let comparison = BarChart {
        title: "Sequential vs parallel time (with reduction)".to_string(),
        x_label: "n".to_string(),
        y: Axis::log("Time (s)"),
        categories: categories,
        series: series,
    };

    let seq_one = table.filter(|r| is_run(r, SEQUENTIAL, 1.0));
    let par_eight = table.filter(|r| is_run(r, PARALLEL, 8.0));
    let categories = distinct(
        &table.filter(|r| is_run(r, SEQUENTIAL, 1.0) || is_run(r, PARALLEL, 8.0)),
        N,
    )?;
    let versus = BarChart {
        title: "Execution time: sequential vs parallel (8 threads)".to_string(),
        x_label: "n".to_string(),
        y: Axis::log("Time (s)"),
        series: vec![
            BarSeries {
                name: "Sequential".to_string(),
                values: bar_means(&seq_one, N, TIME, &categories)?,
            },
            BarSeries {
                name: "Parallel (8 threads)".to_string(),
                values: bar_means(&par_eight, N, TIME, &categories)?,
            },
        ],
        categories: categories,
    };

    Ok(vec![
        Plot::new("sequential.png", Figure::single(Panel::Line(seq_chart))),
        Plot::new("parallel_reduction_threads.png", Figure::single(Panel::Line(par_chart))),
        Plot::new("comparison_bars.png", Figure::single(Panel::Bar(comparison))),
        Plot::new("sequential_vs_parallel8.png", Figure::single(Panel::Bar(versus))),
    ])
}

fn is_run(row: &Row, version: &str, threads: f64) -> bool {
    row.get(VERSION) == Some(version) && row.number(THREADS) == Some(threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "\
n,threads,version,total_primes,time_seconds
1000,1,sequential,168,0.004
1000,2,sequential,168,0.002
1000,2,sequential,168,0.004
1000,2,parallel_reduction,168,0.003
1000,8,parallel_reduction,168,0.001
100000,1,sequential,9592,0.4
100000,2,sequential,9592,0.5
100000,2,parallel_reduction,9592,0.2
100000,8,parallel_reduction,9592,0.05
";

    #[test]
    fn four_charts() {
        let plots = plots(&Table::from_literal(RESULTS).unwrap()).unwrap();
        assert_eq!(plots.len(), 4);

        match plots[0].figure.panels[0] {
            Panel::Line(ref c) => {
                assert_eq!(c.x.scale, ::render::Scale::Log);
                assert_eq!(c.series.len(), 1);
                let points = &c.series[0].points;
                assert_eq!(points.len(), 2);
                assert!((points[0].1 - 0.003).abs() < 1e-12);
                assert_eq!(points[1], (100000.0, 0.5));
            }
            ref p => panic!("unexpected {:?}", p),
        }
        match plots[1].figure.panels[0] {
            Panel::Line(ref c) => {
                let names = c.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
                assert_eq!(names, vec!["2 threads", "8 threads"]);
            }
            ref p => panic!("unexpected {:?}", p),
        }
    }

    #[test]
    fn bars_average_repeated_rows() {
        let plots = plots(&Table::from_literal(RESULTS).unwrap()).unwrap();
        match plots[2].figure.panels[0] {
            Panel::Bar(ref c) => {
                assert_eq!(c.categories, vec!["1000", "100000"]);
                let names = c.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
                assert_eq!(names, vec!["1 threads", "2 threads", "8 threads"]);
                // sequential 0.002, 0.004 and parallel 0.003 at n=1000
                assert!((c.series[1].values[0].unwrap() - 0.003).abs() < 1e-12);
            }
            ref p => panic!("unexpected {:?}", p),
        }
        match plots[3].figure.panels[0] {
            Panel::Bar(ref c) => {
                assert_eq!(c.series[0].values, vec![Some(0.004), Some(0.4)]);
                assert_eq!(c.series[1].values, vec![Some(0.001), Some(0.05)]);
            }
            ref p => panic!("unexpected {:?}", p),
        }
    }
}
