//! Chart specifications and their rendering with `plotters`.
//!
//! A [`Figure`](struct.Figure.html) is plain data: a grid of panels, each a
//! line chart or a grouped bar chart. Building a figure never touches the
//! input tables and drawing a figure never changes it.
//!
//! Log axes are drawn in log10 space and labelled with the original
//! magnitude. Values that cannot be placed on an axis (non-positive on a log
//! axis, infinite or NaN anywhere) are left out with a warning.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use errors::*;
use setting::FigureSetting;

const FONT: &'static str = "sans-serif";
const BAR_GROUP_WIDTH: f64 = 0.8;
const TICK_EPSILON: f64 = 1e-6;

/// How values are placed along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Values as they are.
    Linear,
    /// Base-10 logarithm of the values.
    Log,
}

impl Scale {
    fn forward(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        match *self {
            Scale::Linear => Some(v),
            Scale::Log if v > 0.0 => Some(v.log10()),
            Scale::Log => None,
        }
    }

    fn backward(&self, v: f64) -> f64 {
        match *self {
            Scale::Linear => v,
            Scale::Log => 10f64.powf(v),
        }
    }
}

/// One axis of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Axis description.
    pub label: String,

    /// Linear or log placement.
    pub scale: Scale,

    /// Larger values to the left (or bottom).
    pub inverted: bool,
}

impl Axis {
    /// A linear axis.
    pub fn linear<S: Into<String>>(label: S) -> Self {
        Axis {
            label: label.into(),
            scale: Scale::Linear,
            inverted: false,
        }
    }

    /// A log10 axis.
    pub fn log<S: Into<String>>(label: S) -> Self {
        Axis {
            label: label.into(),
            scale: Scale::Log,
            inverted: false,
        }
    }

    /// The same axis, reversed.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Position of a data value on the drawing axis, if it can be placed.
    pub fn to_plot(&self, v: f64) -> Option<f64> {
        self.scale
            .forward(v)
            .map(|p| if self.inverted { -p } else { p })
    }

    /// Data value at a drawing position.
    pub fn from_plot(&self, p: f64) -> f64 {
        self.scale.backward(if self.inverted { -p } else { p })
    }

    // Log axes are labelled at whole decades only.
    fn tick_label(&self, p: f64) -> String {
        match self.scale {
            Scale::Linear => format_number(self.from_plot(p)),
            Scale::Log if (p - p.round()).abs() < TICK_EPSILON => format_number(self.from_plot(p.round())),
            Scale::Log => String::new(),
        }
    }

    // Drawing range: log axes are widened to whole decades.
    fn extent(&self, (lo, hi): (f64, f64)) -> (f64, f64) {
        match self.scale {
            Scale::Linear => (lo, hi),
            Scale::Log => {
                let (lo, hi) = (lo.floor(), hi.ceil());
                if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
            }
        }
    }

    // Candidate tick count; on a log axis fine enough to hit every decade.
    fn label_count(&self, lo: f64, hi: f64) -> usize {
        match self.scale {
            Scale::Linear => 10,
            Scale::Log => 2 * (hi - lo).ceil() as usize + 2,
        }
    }
}

/// Line drawing style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Colored line with point markers.
    Solid,
    /// Thin black line without markers, e.g. ideal speedup.
    Reference,
}

/// A named sequence of (x, y) points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend entry; empty for no entry.
    pub name: String,

    /// Points in drawing order.
    pub points: Vec<(f64, f64)>,

    /// Line style.
    pub style: SeriesStyle,
}

impl Series {
    /// A solid series.
    pub fn new<S: Into<String>>(name: S, points: Vec<(f64, f64)>) -> Self {
        Series {
            name: name.into(),
            points: points,
            style: SeriesStyle::Solid,
        }
    }

    /// A reference line.
    pub fn reference<S: Into<String>>(name: S, points: Vec<(f64, f64)>) -> Self {
        Series {
            name: name.into(),
            points: points,
            style: SeriesStyle::Reference,
        }
    }
}

/// A line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Caption.
    pub title: String,

    /// Horizontal axis.
    pub x: Axis,

    /// Vertical axis.
    pub y: Axis,

    /// Series, drawn and listed in this order.
    pub series: Vec<Series>,

    /// Explicit x tick positions (data values) and labels. Positions must be
    /// integers in drawing space; when empty the axis picks its own ticks.
    pub x_ticks: Vec<(f64, String)>,
}

impl LineChart {
    /// A chart without series.
    pub fn new<S: Into<String>>(title: S, x: Axis, y: Axis) -> Self {
        LineChart {
            title: title.into(),
            x: x,
            y: y,
            series: Vec::new(),
            x_ticks: Vec::new(),
        }
    }

    /// Adds a series.
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Adds several series.
    pub fn with_all_series<I: IntoIterator<Item = Series>>(mut self, series: I) -> Self {
        self.series.extend(series);
        self
    }

    /// Ticks at the given data values, labelled with the value itself.
    pub fn with_ticks_at(mut self, values: &[f64]) -> Self {
        self.x_ticks = values.iter().map(|&v| (v, format_number(v))).collect();
        self
    }

    /// Ticks at 0, 1, 2, ... labelled with `names`.
    pub fn with_categories(mut self, names: &[&str]) -> Self {
        self.x_ticks = names
            .iter()
            .enumerate()
            .map(|(i, n)| (i as f64, n.to_string()))
            .collect();
        self
    }
}

/// Values of one bar series, one entry per category.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// Legend entry.
    pub name: String,

    /// Bar heights; `None` leaves a gap.
    pub values: Vec<Option<f64>>,
}

/// A grouped bar chart: per category one bar from each series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Caption.
    pub title: String,

    /// Description of the category axis.
    pub x_label: String,

    /// Value axis.
    pub y: Axis,

    /// Category names, left to right.
    pub categories: Vec<String>,

    /// Series, one bar per category each.
    pub series: Vec<BarSeries>,
}

/// One cell of a figure.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// A line chart.
    Line(LineChart),
    /// A grouped bar chart.
    Bar(BarChart),
}

/// A grid of panels written to one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Grid rows.
    pub rows: usize,

    /// Grid columns.
    pub cols: usize,

    /// Panels, row by row.
    pub panels: Vec<Panel>,
}

impl Figure {
    /// A figure with a single panel.
    pub fn single(panel: Panel) -> Self {
        Figure {
            rows: 1,
            cols: 1,
            panels: vec![panel],
        }
    }

    /// A `rows x cols` grid.
    pub fn grid(rows: usize, cols: usize, panels: Vec<Panel>) -> Self {
        Figure {
            rows: rows,
            cols: cols,
            panels: panels,
        }
    }

    /// Pixel size of the whole image.
    pub fn dimension(&self, setting: &FigureSetting) -> (u32, u32) {
        (
            setting.width * self.cols.max(1) as u32,
            setting.height * self.rows.max(1) as u32,
        )
    }

    /// Writes the figure to `path`: SVG for a `.svg` extension, bitmap (PNG)
    /// otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P, setting: &FigureSetting) -> Result<()> {
        let path = path.as_ref();
        if self.panels.len() > self.rows * self.cols {
            bail!(ErrorKind::Render(format!(
                "{} panels do not fit a {}x{} grid",
                self.panels.len(),
                self.rows,
                self.cols
            )));
        }
        let size = self.dimension(setting);
        let svg = path.extension().map_or(false, |e| e == "svg");
        if svg {
            self.draw(SVGBackend::new(path, size).into_drawing_area())?;
        } else {
            self.draw(BitMapBackend::new(path, size).into_drawing_area())?;
        }
        info!("wrote {:?}", path);
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE)?;
        let areas = root.split_evenly((self.rows, self.cols));
        for (area, panel) in areas.iter().zip(self.panels.iter()) {
            match *panel {
                Panel::Line(ref chart) => draw_line_chart(area, chart)?,
                Panel::Bar(ref chart) => draw_bar_chart(area, chart)?,
            }
        }
        root.present()?;
        Ok(())
    }
}

/// Short human form of a tick value.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if a >= 1e5 || a < 1e-3 {
        format!("{:.1e}", v)
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round())
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// Padded drawing range around `values`; a single value gets a unit window.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values.fold(
        (::std::f64::INFINITY, ::std::f64::NEG_INFINITY),
        |(lo, hi), v| (lo.min(v), hi.max(v)),
    );
    if lo > hi {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < ::std::f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn place(chart: &LineChart, series: &Series) -> Vec<(f64, f64)> {
    let placed = series
        .points
        .iter()
        .filter_map(|&(x, y)| match (chart.x.to_plot(x), chart.y.to_plot(y)) {
            (Some(px), Some(py)) => Some((px, py)),
            _ => None,
        })
        .collect::<Vec<_>>();
    if placed.len() < series.points.len() {
        warn!(
            "'{}': {} of {} points of '{}' cannot be drawn on this axis",
            chart.title,
            series.points.len() - placed.len(),
            series.points.len(),
            series.name
        );
    }
    placed
}

fn tick_label(ticks: &[(f64, &str)], p: f64) -> String {
    ticks
        .iter()
        .find(|t| (t.0 - p).abs() < TICK_EPSILON)
        .map(|t| t.1.to_string())
        .unwrap_or_default()
}

fn draw_line_chart<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, chart: &LineChart) -> Result<()> {
    let placed = chart
        .series
        .iter()
        .map(|s| place(chart, s))
        .collect::<Vec<_>>();

    let ticks = chart
        .x_ticks
        .iter()
        .filter_map(|&(v, ref label)| chart.x.to_plot(v).map(|p| (p, label.as_str())))
        .collect::<Vec<_>>();

    let (x0, x1) = chart.x.extent(padded_range(
        placed
            .iter()
            .flat_map(|s| s.iter().map(|p| p.0))
            .chain(ticks.iter().map(|t| t.0)),
    ));
    let (y0, y1) = chart
        .y
        .extent(padded_range(placed.iter().flat_map(|s| s.iter().map(|p| p.1))));

    let mut cc = ChartBuilder::on(area)
        .caption(&chart.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let x_fmt = |p: &f64| if ticks.is_empty() {
        chart.x.tick_label(*p)
    } else {
        tick_label(&ticks, *p)
    };
    let y_fmt = |p: &f64| chart.y.tick_label(*p);
    {
        let mut mesh = cc.configure_mesh();
        mesh.x_desc(chart.x.label.as_str())
            .y_desc(chart.y.label.as_str())
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .y_labels(chart.y.label_count(y0, y1));
        if !ticks.is_empty() {
            // fine enough for every integer position to be a candidate
            let span = (x1 - x0).ceil() as usize;
            mesh.x_labels(2 * span + 2).disable_x_mesh();
        } else {
            mesh.x_labels(chart.x.label_count(x0, x1));
        }
        mesh.draw()?;
    }

    for (i, (series, points)) in chart.series.iter().zip(placed.into_iter()).enumerate() {
        let color = match series.style {
            SeriesStyle::Solid => Palette99::pick(i).to_rgba(),
            SeriesStyle::Reference => BLACK.to_rgba(),
        };
        let width = match series.style {
            SeriesStyle::Solid => 2,
            SeriesStyle::Reference => 1,
        };
        let markers = points.clone();
        let anno = cc.draw_series(LineSeries::new(points, color.stroke_width(width)))?;
        if !series.name.is_empty() {
            anno.label(series.name.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
            });
        }
        if series.style == SeriesStyle::Solid {
            cc.draw_series(markers.into_iter().map(|p| Circle::new(p, 3, color.filled())))?;
        }
    }

    if chart.series.iter().any(|s| !s.name.is_empty()) {
        cc.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_bar_chart<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, chart: &BarChart) -> Result<()> {
    let k = chart.categories.len();
    let placed = chart
        .series
        .iter()
        .map(|s| {
            let bars = s.values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.and_then(|v| chart.y.to_plot(v)).map(|p| (i, p)))
                .collect::<Vec<_>>();
            let given = s.values.iter().filter(|v| v.is_some()).count();
            if bars.len() < given {
                warn!(
                    "'{}': {} bars of '{}' cannot be drawn on this axis",
                    chart.title,
                    given - bars.len(),
                    s.name
                );
            }
            bars
        })
        .collect::<Vec<_>>();

    let heights = placed.iter().flat_map(|s| s.iter().map(|b| b.1));
    let (y0, y1) = match chart.y.scale {
        // bars grow from zero
        Scale::Linear => {
            let negative = placed.iter().any(|s| s.iter().any(|b| b.1 < 0.0));
            let (lo, hi) = padded_range(heights.chain(Some(0.0)));
            (if negative { lo } else { 0.0 }, hi)
        }
        Scale::Log => chart.y.extent(padded_range(heights)),
    };
    let x0 = -0.5;
    let x1 = k.max(1) as f64 - 0.5;

    let mut cc = ChartBuilder::on(area)
        .caption(&chart.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let ticks = chart
        .categories
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, c.as_str()))
        .collect::<Vec<_>>();
    let x_fmt = |p: &f64| tick_label(&ticks, *p);
    let y_fmt = |p: &f64| chart.y.tick_label(*p);
    cc.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y.label.as_str())
        .x_labels(2 * k + 2)
        .y_labels(chart.y.label_count(y0, y1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .disable_x_mesh()
        .draw()?;

    let base = if chart.y.scale == Scale::Linear { 0.0 } else { y0 };
    let width = BAR_GROUP_WIDTH / chart.series.len().max(1) as f64;
    for (j, (series, bars)) in chart.series.iter().zip(placed.into_iter()).enumerate() {
        let color = Palette99::pick(j).to_rgba();
        let offset = -BAR_GROUP_WIDTH / 2.0 + j as f64 * width;
        cc.draw_series(bars.into_iter().map(|(i, h)| {
            let left = i as f64 + offset;
            Rectangle::new([(left, base), (left + width, h)], color.filled())
        }))?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if !chart.series.is_empty() {
        cc.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, process};

    #[test]
    fn log_axis_drops_non_positive() {
        let axis = Axis::log("t");
        assert_eq!(axis.to_plot(100.0), Some(2.0));
        assert_eq!(axis.to_plot(0.0), None);
        assert_eq!(axis.to_plot(-1.0), None);
        assert!((axis.from_plot(-3.0) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn infinite_values_are_not_placed() {
        let axis = Axis::linear("speedup");
        assert_eq!(axis.to_plot(::std::f64::INFINITY), None);
        assert_eq!(axis.to_plot(::std::f64::NAN), None);
        assert_eq!(axis.to_plot(1.5), Some(1.5));
    }

    #[test]
    fn inverted_axis_round_trips() {
        let axis = Axis::linear("pi").inverted();
        assert_eq!(axis.to_plot(3.0), Some(-3.0));
        assert_eq!(axis.from_plot(-3.0), 3.0);
        let axis = Axis::log("n").inverted();
        assert!((axis.from_plot(axis.to_plot(250.0).unwrap()) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn number_format() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.000136), "1.4e-4");
        assert_eq!(format_number(1_000_000.0), "1.0e6");
    }

    #[test]
    fn ranges_are_padded() {
        assert_eq!(padded_range(vec![].into_iter()), (0.0, 1.0));
        assert_eq!(padded_range(vec![2.0].into_iter()), (1.5, 2.5));
        let (lo, hi) = padded_range(vec![0.0, 10.0].into_iter());
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn category_ticks() {
        let chart = LineChart::new("opt", Axis::linear(""), Axis::linear(""))
            .with_categories(&["-O0", "-O2", "-O3"]);
        let ticks = chart
            .x_ticks
            .iter()
            .map(|&(p, ref l)| (p, l.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(tick_label(&ticks, 1.0 + 1e-12), "-O2");
        assert_eq!(tick_label(&ticks, 0.5), "");
    }

    #[test]
    fn points_off_axis_are_skipped() {
        let chart = LineChart::new("t", Axis::log("x"), Axis::linear("y"));
        let series = Series::new("s", vec![(0.0, 1.0), (10.0, 2.0), (100.0, ::std::f64::INFINITY)]);
        assert_eq!(place(&chart, &series), vec![(1.0, 2.0)]);
    }

    #[test]
    fn log_ticks_sit_on_decades() {
        let axis = Axis::log("n");
        assert_eq!(axis.tick_label(3.0), "1000");
        assert_eq!(axis.tick_label(-2.0 + 1e-9), "0.01");
        assert_eq!(axis.tick_label(3.2), "");
        assert_eq!(axis.extent((2.7, 4.3)), (2.0, 5.0));
        assert_eq!(axis.extent((3.0, 3.0)), (3.0, 4.0));
        assert_eq!(axis.label_count(2.0, 5.0), 8);
        assert_eq!(Axis::linear("t").extent((2.7, 4.3)), (2.7, 4.3));
    }

    fn written(name: &str, figure: &Figure) -> u64 {
        let path = env::temp_dir().join(format!("benchviz-{}-{}", process::id(), name));
        figure.save(&path, &FigureSetting::default()).unwrap();
        let size = fs::metadata(&path).unwrap().len();
        fs::remove_file(&path).unwrap();
        size
    }

    #[test]
    fn line_figure_is_written() {
        let chart = LineChart::new("speedup", Axis::linear("Threads"), Axis::linear("Speedup"))
            .with_series(Series::new("close", vec![(1.0, 1.0), (2.0, 1.8), (4.0, 3.1)]))
            .with_series(Series::reference("ideal", vec![(1.0, 1.0), (4.0, 4.0)]))
            .with_ticks_at(&[1.0, 2.0, 4.0]);
        let log = LineChart::new("time", Axis::log("n"), Axis::log("Time (s)"))
            .with_series(Series::new("seq", vec![(1e3, 0.002), (1e5, 0.4), (1e7, 31.0)]));
        let figure = Figure::grid(1, 2, vec![Panel::Line(chart), Panel::Line(log)]);
        assert!(written("line.png", &figure) > 0);
        assert!(written("line.svg", &figure) > 0);
    }

    #[test]
    fn log_bar_figure_is_written() {
        let chart = BarChart {
            title: "time by n".to_string(),
            x_label: "n".to_string(),
            y: Axis::log("Time (s)"),
            categories: vec!["1000".to_string(), "100000".to_string()],
            series: vec![
                BarSeries {
                    name: "1 threads".to_string(),
                    values: vec![Some(0.004), Some(0.4)],
                },
                BarSeries {
                    name: "8 threads".to_string(),
                    values: vec![Some(0.001), None],
                },
            ],
        };
        assert!(written("bars.png", &Figure::single(Panel::Bar(chart))) > 0);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let panel = Panel::Line(LineChart::new("t", Axis::linear("x"), Axis::linear("y")));
        let figure = Figure::grid(1, 1, vec![panel.clone(), panel]);
        let path = ::std::env::temp_dir().join("benchviz-never-written.png");
        assert!(figure.save(&path, &FigureSetting::default()).is_err());
        assert!(!path.exists());
    }
}
