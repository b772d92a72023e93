//! Chart and snapshot setting in TOML.
//!
//! ```toml
//! [figure]
//! width = 1000
//! height = 600
//!
//! [snapshot]
//! edge = 32
//! interval = 10
//! steps = 1000
//! frame_delay = 100
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use toml;

use errors::*;

/// The full setting, passed explicitly to the decoder and the renderer.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Size of rendered charts.
    pub figure: FigureSetting,

    /// Layout of the binary snapshot dump.
    pub snapshot: SnapshotSetting,
}

/// Pixel size of one chart panel.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FigureSetting {
    /// Panel width in pixels.
    pub width: u32,

    /// Panel height in pixels.
    pub height: u32,
}

impl Default for FigureSetting {
    fn default() -> Self {
        FigureSetting {
            width: 1000,
            height: 600,
        }
    }
}

/// Shape of the raw snapshot file and of its animation.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SnapshotSetting {
    /// Edge length `N` of every `N x N x N` cube.
    pub edge: usize,

    /// Simulation steps between two consecutive snapshots.
    pub interval: usize,

    /// Total simulation steps of the run that produced the file.
    pub steps: usize,

    /// Delay between animation frames, in milliseconds.
    pub frame_delay: u32,
}

impl Default for SnapshotSetting {
    fn default() -> Self {
        SnapshotSetting {
            edge: 32,
            interval: 10,
            steps: 1000,
            frame_delay: 100,
        }
    }
}

impl SnapshotSetting {
    /// Number of bytes of one snapshot cube, `None` if it overflows.
    pub fn cube_bytes(&self) -> Option<u64> {
        self.edge
            .checked_mul(self.edge)
            .and_then(|n| n.checked_mul(self.edge))
            .and_then(|n| n.checked_mul(::snapshot::ELEMENT_BYTES))
            .map(|n| n as u64)
    }

    /// Number of snapshots a complete run writes.
    pub fn expected_snapshots(&self) -> usize {
        if self.interval == 0 {
            0
        } else {
            self.steps / self.interval
        }
    }

    /// Simulation step captured by the `index`-th snapshot.
    pub fn step_of(&self, index: usize) -> usize {
        index * self.interval
    }
}

impl Setting {
    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .chain_err(|| ErrorKind::MissingInput(path.display().to_string()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Setting::parse(&contents)
    }

    /// Parses a setting from TOML text; absent keys keep their defaults.
    pub fn parse(contents: &str) -> Result<Setting> {
        let setting = toml::from_str(contents)?;
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_setting_is_default() {
        assert_eq!(Setting::parse("").unwrap(), Setting::default());
    }

    #[test]
    fn partial_override() {
        let s = Setting::parse("[snapshot]\nedge = 16\n").unwrap();
        assert_eq!(s.snapshot.edge, 16);
        assert_eq!(s.snapshot.interval, 10);
        assert_eq!(s.figure, FigureSetting::default());
        assert_eq!(s.snapshot.cube_bytes(), Some(16 * 16 * 16 * 4));
    }

    #[test]
    fn steps_and_labels() {
        let s = SnapshotSetting::default();
        assert_eq!(s.cube_bytes(), Some(131_072));
        assert_eq!(s.expected_snapshots(), 100);
        assert_eq!(s.step_of(3), 30);
    }

    #[test]
    fn missing_file() {
        match Setting::init("/nonexistent/benchviz.toml") {
            Err(Error(ErrorKind::MissingInput(_), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_toml() {
        assert!(Setting::parse("[figure]\nwidth = \"wide\"").is_err());
    }
}
