//! OpenMP `schedule` and `collapse` clauses, with or without a competing
//! load on the machine.

use errors::*;
use experiment::{Plot, first_seen, grouped_bars};
use render::{Axis, BarChart, Figure, Panel};
use table::Table;

/// Schedule kind (`static`, `dynamic`, `guided`, ...).
pub const SCHEDULE: &str = "schedule_type";
/// Chunk size passed to the clause.
pub const CHUNK: &str = "chunk_size";
/// Depth given to `collapse`.
pub const COLLAPSE: &str = "collapse";
/// Wall time column.
pub const TIME: &str = "time_seconds";

/// One bar chart per schedule kind, in order of first appearance: mean time
/// per chunk size, one bar per collapse depth. `disturbance` tells whether
/// the run shared the machine and only changes captions and file names.
pub fn plots(table: &Table, disturbance: bool) -> Result<Vec<Plot>> {
    let condition = if disturbance { "with" } else { "without" };
    let mut plots = Vec::new();
    for schedule in first_seen(table, SCHEDULE)? {
        let subset = table.filter_eq(SCHEDULE, &schedule)?;
        let (categories, series) =
            grouped_bars(&subset, CHUNK, COLLAPSE, TIME, |c| format!("Collapse {}", c))?;
        let chart = BarChart {
            title: format!(
                "Execution time - schedule: {} ({} disturbance)",
                schedule,
                condition
            ),
            x_label: "Chunk size".to_string(),
            y: Axis::linear("Time (s)"),
            categories: categories,
            series: series,
        };
        plots.push(Plot::new(
            format!("benchmark_{}_disturbance_{}.png", condition, schedule),
            Figure::single(Panel::Bar(chart)),
        ));
    }
    debug!("{} schedule kinds", plots.len());
    Ok(plots)
}
