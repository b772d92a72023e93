//! Thread affinity: `OMP_PROC_BIND` policies against thread count.

use errors::*;
use experiment::{Plot, derived_series};
use render::{Axis, Figure, LineChart, Panel};
use scaling::{Baseline, Derivation, Derived, GroupKey};
use table::Table;

/// Binding policy column.
pub const BIND: &str = "OMP_PROC_BIND";
/// Thread count column.
pub const THREADS: &str = "Threads";
/// Wall time column.
pub const TIME: &str = "Tempo (s)";

/// Default baseline degree: one thread.
pub const DEFAULT_BASELINE: Baseline = Baseline::Fixed(1.0);

/// Time, speedup and efficiency against thread count, one series per
/// binding policy.
pub fn plots(table: &Table, baseline: Baseline) -> Result<Vec<Plot>> {
    let derived = Derivation::new(THREADS, TIME)
        .group_by(&[BIND])
        .baseline(baseline)
        .derive(table)?;

    let chart = |title: &str, y: &str, value: fn(&Derived) -> f64| {
        LineChart::new(title, Axis::linear("Threads"), Axis::linear(y))
            .with_all_series(derived_series(&derived, value, label))
    };

    Ok(vec![
        Plot::new(
            "affinity_time.png",
            Figure::single(Panel::Line(chart(
                "Execution time by thread count and affinity",
                "Time (s)",
                |d| d.time,
            ))),
        ),
        Plot::new(
            "affinity_speedup.png",
            Figure::single(Panel::Line(chart(
                "Speedup by thread count and affinity",
                "Speedup",
                |d| d.speedup,
            ))),
        ),
        Plot::new(
            "affinity_efficiency.png",
            Figure::single(Panel::Line(chart(
                "Efficiency by thread count and affinity",
                "Efficiency",
                |d| d.efficiency,
            ))),
        ),
    ])
}

fn label(bind: &GroupKey) -> String {
    format!("{}={}", BIND, bind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "\
OMP_PROC_BIND,Threads,Tempo (s)
spread,1,8.0
spread,2,4.4
spread,4,2.5
close,1,8.2
close,2,4.1
close,4,2.05
";

    fn series(plot: &Plot) -> Vec<(String, Vec<(f64, f64)>)> {
        match plot.figure.panels[0] {
            Panel::Line(ref c) => c.series.iter().map(|s| (s.name.clone(), s.points.clone())).collect(),
            ref p => panic!("unexpected {:?}", p),
        }
    }

    #[test]
    fn series_per_policy_in_key_order() {
        let plots = plots(&Table::from_literal(RESULTS).unwrap(), DEFAULT_BASELINE).unwrap();
        assert_eq!(plots.len(), 3);
        let time = series(&plots[0]);
        assert_eq!(time[0].0, "OMP_PROC_BIND=close");
        assert_eq!(time[1].0, "OMP_PROC_BIND=spread");
        assert_eq!(time[1].1, vec![(1.0, 8.0), (2.0, 4.4), (4.0, 2.5)]);
    }

    #[test]
    fn speedup_and_efficiency_against_one_thread() {
        let plots = plots(&Table::from_literal(RESULTS).unwrap(), DEFAULT_BASELINE).unwrap();
        let speedup = series(&plots[1]);
        let efficiency = series(&plots[2]);
        assert!((speedup[0].1[1].1 - 2.0).abs() < 1e-9);
        assert!((efficiency[0].1[2].1 - 1.0).abs() < 1e-9);
        for (s, e) in speedup[1].1.iter().zip(&efficiency[1].1) {
            assert!((e.1 - s.1 / s.0).abs() < 1e-9);
        }
    }

    #[test]
    fn baseline_two_threads() {
        let plots = plots(&Table::from_literal(RESULTS).unwrap(), Baseline::Fixed(2.0)).unwrap();
        let speedup = series(&plots[1]);
        assert!((speedup[0].1[1].1 - 1.0).abs() < 1e-9);
        assert!((speedup[0].1[0].1 - 0.5).abs() < 1e-9);
    }
}
