//! Strong and weak scaling of the stencil solver.

use errors::*;
use experiment::{Plot, column_points};
use render::{Axis, Figure, LineChart, Panel, Series};
use scaling::Derivation;
use table::Table;

/// Thread count column.
pub const THREADS: &str = "Threads";
/// Wall time column.
pub const TIME: &str = "Time (s)";
/// Problem size column.
pub const SIZE: &str = "N";

/// Measured strong scaling run: fixed `N`, growing thread count.
pub const STRONG: &str = "\
N,NSTEPS,Threads,Time (s)
256,1000,1,206.182
256,1000,2,181.725
256,1000,4,183.169
256,1000,8,183.608
256,1000,16,184.781
256,1000,24,185.823
";

/// Measured weak scaling run: `N` grows with the thread count.
pub const WEAK: &str = "\
N,NSTEPS,Threads,Time (s)
32,1000,1,0.610
40,1000,2,1.197
51,1000,4,2.641
64,1000,8,4.764
80,1000,16,8.399
91,1000,24,11.920
";

/// Charts for the built-in measurements.
pub fn builtin() -> Result<Vec<Plot>> {
    plots(&Table::from_literal(STRONG)?, &Table::from_literal(WEAK)?)
}

/// `strong_scaling.png` (time plus speedup and efficiency against the
/// lowest thread count) and `weak_scaling.png`.
pub fn plots(strong: &Table, weak: &Table) -> Result<Vec<Plot>> {
    let threads = strong.numeric(THREADS)?;
    let size = strong.text(SIZE)?.first().map(|n| n.to_string()).unwrap_or_default();

    let time = LineChart::new(
        format!("Strong scaling: time vs threads (N={})", size),
        Axis::linear("Threads"),
        Axis::linear("Time (s)"),
    ).with_series(Series::new("Strong scaling", column_points(strong, THREADS, TIME)?))
        .with_ticks_at(&threads);

    let derived = Derivation::new(THREADS, TIME).derive(strong)?;
    let ratios = LineChart::new(
        "Strong scaling: speedup and efficiency",
        Axis::linear("Threads"),
        Axis::linear("Ratio"),
    ).with_series(Series::new(
        "Speedup",
        derived.iter().map(|d| (d.degree, d.speedup)).collect(),
    ))
        .with_series(Series::new(
            "Efficiency",
            derived.iter().map(|d| (d.degree, d.efficiency)).collect(),
        ))
        .with_ticks_at(&threads);

    let weak_chart = LineChart::new(
        "Weak scaling: time vs threads (N proportional)",
        Axis::linear("Threads"),
        Axis::linear("Time (s)"),
    ).with_series(Series::new("Weak scaling", column_points(weak, THREADS, TIME)?))
        .with_ticks_at(&weak.numeric(THREADS)?);

    Ok(vec![
        Plot::new(
            "strong_scaling.png",
            Figure::grid(1, 2, vec![Panel::Line(time), Panel::Line(ratios)]),
        ),
        Plot::new("weak_scaling.png", Figure::single(Panel::Line(weak_chart))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(plot: &Plot, idx: usize) -> &LineChart {
        match plot.figure.panels[idx] {
            Panel::Line(ref c) => c,
            ref p => panic!("unexpected panel {:?}", p),
        }
    }

    #[test]
    fn builtin_figures() {
        let plots = builtin().unwrap();
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].file_name, "strong_scaling.png");
        assert_eq!(plots[1].file_name, "weak_scaling.png");

        let time = line(&plots[0], 0);
        assert!(time.title.contains("N=256"));
        let ticks = time.x_ticks.iter().map(|t| t.0).collect::<Vec<_>>();
        assert_eq!(ticks, vec![1.0, 2.0, 4.0, 8.0, 16.0, 24.0]);
        assert_eq!(time.series[0].points[0], (1.0, 206.182));
    }

    #[test]
    fn strong_scaling_ratios() {
        let plots = builtin().unwrap();
        let ratios = line(&plots[0], 1);
        let speedup = &ratios.series[0].points;
        let efficiency = &ratios.series[1].points;
        assert!((speedup[0].1 - 1.0).abs() < 1e-9);
        assert!((speedup[1].1 - 1.1346).abs() < 1e-4);
        assert!((efficiency[1].1 - 0.5673).abs() < 1e-4);
    }
}
