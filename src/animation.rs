//! Animated view of a snapshot series: one GIF frame per snapshot, each the
//! middle Z plane drawn as a 3-D surface.

use plotters::prelude::*;
use std::path::Path;

use errors::*;
use setting::FigureSetting;
use snapshot::{Slice, SnapshotSeries};

/// Renders `series` to a GIF at `path`. Frames follow file order and are
/// captioned with the simulation step they capture. All frames share one
/// value axis so that the evolution is comparable.
pub fn render_snapshots<P: AsRef<Path>>(
    series: &SnapshotSeries,
    title: &str,
    figure: &FigureSetting,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if series.is_empty() {
        bail!(ErrorKind::Render("no snapshots to animate".to_string()));
    }
    let setting = series.setting();
    let slices = series.iter().map(|s| s.middle_slice()).collect::<Vec<_>>();
    let (lo, hi) = value_range(&slices);
    let last = (setting.edge.max(2) - 1) as f64;

    let root = BitMapBackend::gif(path, (figure.width, figure.height), setting.frame_delay)
        .map_err(|e| ErrorKind::Render(e.to_string()))?
        .into_drawing_area();

    for (idx, slice) in slices.iter().enumerate() {
        root.fill(&WHITE)?;
        let caption = format!("{} - Step {}", title, setting.step_of(idx));
        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 24).into_font())
            .margin(20)
            .build_cartesian_3d(0f64..last, lo..hi, 0f64..last)?;
        chart.with_projection(|mut pb| {
            pb.yaw = 0.8;
            pb.pitch = 0.35;
            pb.scale = 0.85;
            pb.into_matrix()
        });
        chart.configure_axes().draw()?;

        let color = |v: &f64| -> ShapeStyle {
            let t = ((v - lo) / (hi - lo)).max(0.0).min(1.0);
            HSLColor(0.75 - 0.6 * t, 0.8, 0.3 + 0.35 * t).filled()
        };
        let n = slice.edge();
        chart.draw_series(
            SurfaceSeries::xoz(
                (0..n).map(|i| i as f64),
                (0..n).map(|i| i as f64),
                |x, z| slice.at(x as usize, z as usize) as f64,
            ).style_func(&color),
        )?;
        root.present()?;
        debug!("frame {} (step {}) done", idx, setting.step_of(idx));
    }
    info!("wrote {} frames to {:?}", slices.len(), path);
    Ok(())
}

fn value_range(slices: &[Slice]) -> (f64, f64) {
    let bounds = slices.iter().filter_map(|s| s.bounds()).fold(None, |acc, (lo, hi)| {
        match acc {
            None => Some((lo, hi)),
            Some((a, b)) => Some((lo.min(a), hi.max(b))),
        }
    });
    match bounds {
        Some((lo, hi)) if hi > lo => (lo as f64, hi as f64),
        Some((v, _)) => (v as f64 - 0.5, v as f64 + 0.5),
        None => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setting::SnapshotSetting;

    fn series(values: &[f32]) -> SnapshotSeries {
        let setting = SnapshotSetting {
            edge: 2,
            ..SnapshotSetting::default()
        };
        let mut bytes = Vec::new();
        for v in values {
            for _ in 0..8 {
                bytes.extend_from_slice(&v.to_bits().to_le_bytes());
            }
        }
        SnapshotSeries::decode(&bytes, &setting).unwrap()
    }

    #[test]
    fn shared_value_range() {
        let s = series(&[1.0, 3.0]);
        let slices = s.iter().map(|s| s.middle_slice()).collect::<Vec<_>>();
        assert_eq!(value_range(&slices), (1.0, 3.0));
    }

    #[test]
    fn flat_field_gets_a_window() {
        let s = series(&[0.0]);
        let slices = s.iter().map(|s| s.middle_slice()).collect::<Vec<_>>();
        assert_eq!(value_range(&slices), (-0.5, 0.5));
    }

    #[test]
    fn two_snapshots_make_a_gif() {
        let setting = SnapshotSetting {
            edge: 8,
            ..SnapshotSetting::default()
        };
        let mut bytes = Vec::new();
        for s in 0..2 {
            for i in 0..512 {
                let v = (s * 512 + i) as f32 / 100.0;
                bytes.extend_from_slice(&v.to_bits().to_le_bytes());
            }
        }
        let series = SnapshotSeries::decode(&bytes, &setting).unwrap();
        let figure = FigureSetting {
            width: 320,
            height: 240,
        };
        let path = ::std::env::temp_dir().join(format!("benchviz-{}-fluid.gif", ::std::process::id()));
        render_snapshots(&series, "Fluid", &figure, &path).unwrap();
        let size = ::std::fs::metadata(&path).unwrap().len();
        ::std::fs::remove_file(&path).unwrap();
        assert!(size > 0);
    }

    #[test]
    fn empty_series_is_not_rendered() {
        let s = series(&[]);
        let path = ::std::env::temp_dir().join("benchviz-empty.gif");
        assert!(render_snapshots(&s, "empty", &FigureSetting::default(), &path).is_err());
        assert!(!path.exists());
    }
}
