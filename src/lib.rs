//! benchviz: derive scaling metrics from HPC benchmark tables and chart them.
//!
//! The library is a linear pipeline. A [`Table`](struct.Table.html) is loaded
//! from a delimited file, measurements are pulled out of it and handed to a
//! [`Derivation`](struct.Derivation.html) that computes speedup and
//! efficiency, and the resulting numbers are laid out as a
//! [`Figure`](struct.Figure.html) that the renderer writes to disk. Raw
//! simulation dumps go through [`SnapshotSeries`](struct.SnapshotSeries.html)
//! and are rendered as an animation instead.
#![recursion_limit = "1024"]
#![deny(missing_docs)]

extern crate average;
extern crate byteorder;
extern crate csv;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate plotters;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

mod errors;
pub use errors::{Error, ErrorKind, Result, ResultExt};

mod setting;
pub use setting::{FigureSetting, Setting, SnapshotSetting};

mod table;
pub use table::{Row, Table};

mod scaling;
pub use scaling::{Baseline, Derivation, Derived, GroupKey, Measurement, Summary, derive, summarize};

mod snapshot;
pub use snapshot::{Slice, Snapshot, SnapshotSeries};

mod render;
pub use render::{Axis, BarChart, BarSeries, Figure, LineChart, Panel, Scale, Series, SeriesStyle};

mod animation;
pub use animation::render_snapshots;

pub mod experiment;
