//! Convergence of the series approximation of pi.

use errors::*;
use experiment::{Plot, column_points};
use render::{Axis, Figure, LineChart, Panel, Series};
use table::Table;

/// Terms summed.
pub const ITERATIONS: &str = "Iterations";
/// Value reached.
pub const APPROXIMATION: &str = "Approximation of PI";
/// Distance to pi.
pub const ERROR: &str = "Absolute Error";
/// Wall time column.
pub const TIME: &str = "Execution Time (s)";
/// Matching decimal places.
pub const DECIMALS: &str = "Correct Decimal Places";

/// A 2x2 grid of iterations (log scale) against each measured column.
pub fn plots(table: &Table) -> Result<Vec<Plot>> {
    let panel = |title: &str, column: &str, x: Axis| -> Result<Panel> {
        let chart = LineChart::new(title, x, Axis::log("Iterations (log scale)"))
            .with_series(Series::new(column, column_points(table, column, ITERATIONS)?));
        Ok(Panel::Line(chart))
    };
    let panels = vec![
        panel(
            "Iterations vs approximation of pi",
            APPROXIMATION,
            Axis::linear("Approximation of pi").inverted(),
        )?,
        panel(
            "Iterations vs absolute error",
            ERROR,
            Axis::log("Absolute error (log scale)"),
        )?,
        panel(
            "Iterations vs execution time",
            TIME,
            Axis::log("Execution time (s)"),
        )?,
        panel(
            "Iterations vs correct decimal places",
            DECIMALS,
            Axis::linear("Correct decimal places"),
        )?,
    ];
    Ok(vec![
        Plot::new("pi_approximation.png", Figure::grid(2, 2, panels)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use render::Scale;

    const DATA: &str = "\
Iterations,Approximation of PI,Absolute Error,Execution Time (s),Correct Decimal Places
10,3.0418396189,0.0997530347,0.000001,1
1000,3.1405926538,0.0009999998,0.000004,2
1000000,3.1415916536,0.0000010000,0.003100,5
";

    #[test]
    fn grid_of_four() {
        let plots = plots(&Table::from_literal(DATA).unwrap()).unwrap();
        let fig = &plots[0].figure;
        assert_eq!((fig.rows, fig.cols, fig.panels.len()), (2, 2, 4));
        let charts = fig.panels
            .iter()
            .map(|p| match *p {
                Panel::Line(ref c) => c,
                ref p => panic!("unexpected {:?}", p),
            })
            .collect::<Vec<_>>();
        assert!(charts.iter().all(|c| c.y.scale == Scale::Log));
        assert!(charts[0].x.inverted);
        assert_eq!(charts[1].x.scale, Scale::Log);
        assert_eq!(charts[2].x.scale, Scale::Log);
        assert_eq!(charts[3].x.scale, Scale::Linear);
        assert_eq!(charts[3].series[0].points[2], (5.0, 1000000.0));
    }
}
