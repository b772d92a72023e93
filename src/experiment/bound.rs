//! Memory-bound against compute-bound kernels.

use errors::*;
use experiment::{Plot, column_points};
use render::{Axis, Figure, LineChart, Panel, Series};
use scaling::{Derivation, Derived};
use table::Table;

/// Thread count column.
pub const THREADS: &str = "Threads";
/// Wall time of the memory-bound kernel.
pub const MEMORY: &str = "Memory-Bound Time (s)";
/// Wall time of the compute-bound kernel.
pub const COMPUTE: &str = "Compute-Bound Time (s)";

/// Largest thread count shown in the zoomed speedup panel.
pub const ZOOM_THREADS: f64 = 16.0;

/// A 2x2 grid: time, speedup with the ideal line, efficiency and speedup up
/// to 16 threads. Baseline is the lowest thread count.
pub fn plots(table: &Table) -> Result<Vec<Plot>> {
    let memory = Derivation::new(THREADS, MEMORY).derive(table)?;
    let compute = Derivation::new(THREADS, COMPUTE).derive(table)?;

    let time = LineChart::new(
        "Execution time vs threads",
        Axis::linear("Threads"),
        Axis::linear("Time (s)"),
    ).with_series(Series::new("Memory-Bound", column_points(table, THREADS, MEMORY)?))
        .with_series(Series::new("Compute-Bound", column_points(table, THREADS, COMPUTE)?));

    let efficiency = LineChart::new(
        "Efficiency vs threads",
        Axis::linear("Threads"),
        Axis::linear("Efficiency"),
    ).with_all_series(pair(&memory, &compute, |d| d.efficiency, ::std::f64::INFINITY));

    Ok(vec![
        Plot::new(
            "performance_analysis.png",
            Figure::grid(
                2,
                2,
                vec![
                    Panel::Line(time),
                    Panel::Line(speedup("Speedup vs threads", &memory, &compute, ::std::f64::INFINITY)),
                    Panel::Line(efficiency),
                    Panel::Line(speedup("Speedup up to 16 threads", &memory, &compute, ZOOM_THREADS)),
                ],
            ),
        ),
    ])
}

fn speedup(title: &str, memory: &[Derived], compute: &[Derived], limit: f64) -> LineChart {
    let ideal = memory
        .iter()
        .filter(|d| d.degree <= limit)
        .map(|d| (d.degree, d.degree))
        .collect();
    LineChart::new(title, Axis::linear("Threads"), Axis::linear("Speedup"))
        .with_all_series(pair(memory, compute, |d| d.speedup, limit))
        .with_series(Series::reference("Ideal speedup", ideal))
}

fn pair<F>(memory: &[Derived], compute: &[Derived], value: F, limit: f64) -> Vec<Series>
where
    F: Fn(&Derived) -> f64,
{
    let points = |rows: &[Derived]| -> Vec<(f64, f64)> {
        rows.iter()
            .filter(|d| d.degree <= limit)
            .map(|d| (d.degree, value(d)))
            .collect()
    };
    vec![
        Series::new("Memory-Bound", points(memory)),
        Series::new("Compute-Bound", points(compute)),
    ]
}
