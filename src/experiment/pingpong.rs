//! MPI ping-pong latency.

use errors::*;
use experiment::{Plot, column_points};
use render::{Axis, Figure, LineChart, Panel, Series};
use table::Table;

/// Message size in bytes.
pub const SIZE: &str = "Tamanho (bytes)";
/// Mean round trip in microseconds.
pub const TIME: &str = "Tempo médio (us)";

/// Mean time against message size, size on a log axis.
pub fn plots(table: &Table) -> Result<Vec<Plot>> {
    let chart = LineChart::new(
        "MPI communication time vs message size",
        Axis::log("Message size (bytes)"),
        Axis::linear("Mean time (us)"),
    ).with_series(Series::new("Ping-pong", column_points(table, SIZE, TIME)?));
    Ok(vec![
        Plot::new("pingpong_plot.png", Figure::single(Panel::Line(chart))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use render::Scale;

    #[test]
    fn latency_against_size() {
        let table = Table::from_literal(
            "Tamanho (bytes),Tempo médio (us)\n8,1.2\n1024,2.5\n1048576,410.0\n",
        ).unwrap();
        let plots = plots(&table).unwrap();
        match plots[0].figure.panels[0] {
            Panel::Line(ref c) => {
                assert_eq!(c.x.scale, Scale::Log);
                assert_eq!(c.y.scale, Scale::Linear);
                assert_eq!(c.series[0].points[1], (1024.0, 2.5));
            }
            ref p => panic!("unexpected {:?}", p),
        }
    }

    #[test]
    fn wrong_columns() {
        let table = Table::from_literal("bytes,us\n8,1.2\n").unwrap();
        match *plots(&table).unwrap_err().kind() {
            ErrorKind::UnknownColumn(ref c) => assert_eq!(c, SIZE),
            ref k => panic!("unexpected {:?}", k),
        }
    }
}
