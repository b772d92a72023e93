//! MPI collective operations on square matrices.

use errors::*;
use experiment::{Plot, derived_series, mean_series};
use render::{Axis, Figure, LineChart, Panel};
use scaling::{Baseline, Derivation};
use table::Table;

/// Process count column.
pub const PROCESSES: &str = "Number of Process";
/// Matrix size, written `"<N> x <N>"`.
pub const SIZE: &str = "Size";
/// Trial number.
pub const EXECUTION: &str = "Execution";
/// Wall time column.
pub const TIME: &str = "Time (s)";

/// Default baseline degree: the smallest run uses two processes.
pub const DEFAULT_BASELINE: Baseline = Baseline::Fixed(2.0);

/// Reference measurements: three trials per process count and size.
pub const REFERENCE: &str = "\
Number of Process,Size,Execution,Time (s)
2,512 x 512,1,0.000136
2,512 x 512,2,0.000137
2,512 x 512,3,0.000130
2,1024 x 1024,1,0.000442
2,1024 x 1024,2,0.000442
2,1024 x 1024,3,0.000442
2,2048 x 2048,1,0.002082
2,2048 x 2048,2,0.002069
2,2048 x 2048,3,0.002075
2,3072 x 3072,1,0.004566
2,3072 x 3072,2,0.004595
2,3072 x 3072,3,0.004583
2,4096 x 4096,1,0.008106
2,4096 x 4096,2,0.008121
2,4096 x 4096,3,0.008124
4,512 x 512,1,0.000074
4,512 x 512,2,0.000069
4,512 x 512,3,0.000067
4,1024 x 1024,1,0.000300
4,1024 x 1024,2,0.000261
4,1024 x 1024,3,0.000244
4,2048 x 2048,1,0.001211
4,2048 x 2048,2,0.001065
4,2048 x 2048,3,0.001216
4,3072 x 3072,1,0.002710
4,3072 x 3072,2,0.002710
4,3072 x 3072,3,0.002735
4,4096 x 4096,1,0.004791
4,4096 x 4096,2,0.004825
4,4096 x 4096,3,0.004802
8,512 x 512,1,0.000039
8,512 x 512,2,0.000040
8,512 x 512,3,0.000040
8,1024 x 1024,1,0.000158
8,1024 x 1024,2,0.000156
8,1024 x 1024,3,0.000176
8,2048 x 2048,1,0.000654
8,2048 x 2048,2,0.000609
8,2048 x 2048,3,0.000586
8,3072 x 3072,1,0.001355
8,3072 x 3072,2,0.001474
8,3072 x 3072,3,0.001482
8,4096 x 4096,1,0.002689
8,4096 x 4096,2,0.002447
8,4096 x 4096,3,0.002469
16,512 x 512,1,0.000023
16,512 x 512,2,0.000026
16,512 x 512,3,0.000023
16,1024 x 1024,1,0.000079
16,1024 x 1024,2,0.000083
16,1024 x 1024,3,0.000078
16,2048 x 2048,1,0.000312
16,2048 x 2048,2,0.000315
16,2048 x 2048,3,0.000315
16,3072 x 3072,1,0.000722
16,3072 x 3072,2,0.000713
16,3072 x 3072,3,0.000709
16,4096 x 4096,1,0.001240
16,4096 x 4096,2,0.001251
16,4096 x 4096,3,0.001248
32,512 x 512,1,0.000016
32,512 x 512,2,0.000016
32,512 x 512,3,0.000016
32,1024 x 1024,1,0.000045
32,1024 x 1024,2,0.000047
32,1024 x 1024,3,0.000046
32,2048 x 2048,1,0.000174
32,2048 x 2048,2,0.000168
32,2048 x 2048,3,0.000173
32,3072 x 3072,1,0.000387
32,3072 x 3072,2,0.000377
32,3072 x 3072,3,0.000372
32,4096 x 4096,1,0.000651
32,4096 x 4096,2,0.000656
32,4096 x 4096,3,0.000638
";

/// Charts for the reference measurements.
pub fn builtin(baseline: Baseline) -> Result<Vec<Plot>> {
    plots(&Table::from_literal(REFERENCE)?, baseline)
}

/// Trials are averaged per (process count, size) before plotting: mean time
/// against size per process count, mean time against process count per
/// size, and speedup against process count per size.
pub fn plots(table: &Table, baseline: Baseline) -> Result<Vec<Plot>> {
    let table = table.reduce_to_leading_integer(SIZE)?;

    let by_size = Derivation::new(SIZE, TIME).group_by(&[PROCESSES]).summarize(&table)?;
    let time_vs_size = LineChart::new(
        "Execution time vs matrix size",
        Axis::linear("Matrix size (N x N)"),
        Axis::linear("Mean time (s)"),
    ).with_all_series(mean_series(&by_size, |np| format!("{} processes", np)));

    let per_size = Derivation::new(PROCESSES, TIME)
        .group_by(&[SIZE])
        .baseline(baseline);
    let by_processes = per_size.summarize(&table)?;
    let time_vs_processes = LineChart::new(
        "Execution time vs number of processes",
        Axis::linear("MPI processes"),
        Axis::linear("Mean time (s)"),
    ).with_all_series(mean_series(&by_processes, |s| format!("{} x {}", s, s)));

    let derived = per_size.derive_mean(&table)?;
    let speedup = LineChart::new(
        "Speedup vs number of processes",
        Axis::linear("MPI processes"),
        Axis::linear("Speedup"),
    ).with_all_series(derived_series(&derived, |d| d.speedup, |s| format!("{} x {}", s, s)));

    Ok(vec![
        Plot::new("collective_time_vs_size.png", Figure::single(Panel::Line(time_vs_size))),
        Plot::new(
            "collective_time_vs_processes.png",
            Figure::single(Panel::Line(time_vs_processes)),
        ),
        Plot::new("collective_speedup.png", Figure::single(Panel::Line(speedup))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(plot: &Plot) -> &LineChart {
        match plot.figure.panels[0] {
            Panel::Line(ref c) => c,
            ref p => panic!("unexpected {:?}", p),
        }
    }

    #[test]
    fn reference_table_shape() {
        let table = Table::from_literal(REFERENCE).unwrap();
        assert_eq!(table.len(), 75);
        assert_eq!(table.headers(), &[PROCESSES, SIZE, EXECUTION, TIME]);
    }

    #[test]
    fn series_per_process_count_and_size() {
        let plots = builtin(DEFAULT_BASELINE).unwrap();
        assert_eq!(plots.len(), 3);

        let by_size = line(&plots[0]);
        let names = by_size.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["2 processes", "4 processes", "8 processes", "16 processes", "32 processes"]
        );
        let sizes = by_size.series[0].points.iter().map(|p| p.0).collect::<Vec<_>>();
        assert_eq!(sizes, vec![512.0, 1024.0, 2048.0, 3072.0, 4096.0]);

        let by_np = line(&plots[1]);
        assert_eq!(by_np.series[0].name, "512 x 512");
        assert_eq!(by_np.series.len(), 5);
    }

    #[test]
    fn speedup_against_two_processes() {
        let plots = builtin(DEFAULT_BASELINE).unwrap();
        let speedup = line(&plots[2]);
        let small = &speedup.series[0].points;
        assert_eq!(small[0].0, 2.0);
        assert!((small[0].1 - 1.0).abs() < 1e-9);
        let base = (0.000136 + 0.000137 + 0.000130) / 3.0;
        let four = (0.000074 + 0.000069 + 0.000067) / 3.0;
        assert!((small[1].1 - base / four).abs() < 1e-6);
    }

    #[test]
    fn missing_baseline_degree() {
        match *builtin(Baseline::Fixed(3.0)).unwrap_err().kind() {
            ErrorKind::BaselineNotFound(ref group, ref degree) => {
                assert_eq!(group, "512");
                assert_eq!(degree, "3");
            }
            ref k => panic!("unexpected {:?}", k),
        }
    }

    #[test]
    fn lowest_baseline_matches_default_here() {
        let fixed = builtin(DEFAULT_BASELINE).unwrap();
        let lowest = builtin(Baseline::Lowest).unwrap();
        assert_eq!(fixed[2], lowest[2]);
    }
}
