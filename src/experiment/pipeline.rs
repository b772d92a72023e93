//! Summation kernels compiled at different optimization levels.

use errors::*;
use experiment::Plot;
use render::{Axis, Figure, LineChart, Panel, Series};
use table::Table;

/// Column naming the optimization level; every other column is a kernel.
pub const LEVEL: &str = "Optimization";

/// Measured run times in seconds.
pub const TIMES: &str = "\
Optimization,Initialization,Dependent,Independent - 2 accumulators,Independent - 4 accumulators,Independent - 8 accumulators
-O0,0.127321,0.118464,0.055164,0.051404,0.054173
-O2,0.041316,0.023662,0.007997,0.006590,0.009964
-O3,0.040452,0.022007,0.006915,0.007453,0.009818
";

/// Charts for the built-in measurements.
pub fn builtin() -> Result<Vec<Plot>> {
    plots(&Table::from_literal(TIMES)?)
}

/// One line per kernel over the optimization levels, in table order.
pub fn plots(table: &Table) -> Result<Vec<Plot>> {
    let levels = table.text(LEVEL)?;
    let mut chart = LineChart::new(
        "Impact of optimizations on execution time",
        Axis::linear("Optimization level"),
        Axis::linear("Execution time (s)"),
    ).with_categories(&levels);

    for kernel in table.headers().iter().filter(|h| *h != LEVEL) {
        let points = table
            .numeric(kernel)?
            .into_iter()
            .enumerate()
            .map(|(i, t)| (i as f64, t))
            .collect();
        chart = chart.with_series(Series::new(kernel.as_str(), points));
    }

    Ok(vec![
        Plot::new("optimization_levels.png", Figure::single(Panel::Line(chart))),
    ])
}
