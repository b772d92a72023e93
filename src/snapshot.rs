//! Decoder for raw simulation snapshot dumps.
//!
//! The file has no header: it is a run of `N x N x N` cubes of little-endian
//! `f32`, row-major (`x` slowest, `z` fastest), snapshot 0 first. The number
//! of snapshots follows from the file size alone.

use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use errors::*;
use setting::SnapshotSetting;

/// Width of one stored value.
pub const ELEMENT_BYTES: usize = 4;

/// One `N x N x N` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    edge: usize,
    data: Vec<f32>,
}

/// One `N x N` plane cut out of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    edge: usize,
    data: Vec<f32>,
}

/// All snapshots of a file, in file order.
#[derive(Debug, Clone)]
pub struct SnapshotSeries {
    setting: SnapshotSetting,
    snapshots: Vec<Snapshot>,
}

impl Snapshot {
    /// Edge length of the cube.
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Value at (`x`, `y`, `z`).
    #[inline]
    pub fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[(x * self.edge + y) * self.edge + z]
    }

    /// The plane `snapshot[:, :, z]`.
    pub fn slice_z(&self, z: usize) -> Slice {
        assert!(z < self.edge, "slice {} out of cube of edge {}", z, self.edge);
        let n = self.edge;
        let mut data = Vec::with_capacity(n * n);
        for x in 0..n {
            for y in 0..n {
                data.push(self.at(x, y, z));
            }
        }
        Slice {
            edge: n,
            data: data,
        }
    }

    /// The plane at the middle of the Z axis (`N / 2`).
    pub fn middle_slice(&self) -> Slice {
        self.slice_z(self.edge / 2)
    }
}

impl Slice {
    /// Edge length of the plane.
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Value at (`x`, `y`).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[x * self.edge + y]
    }

    /// Smallest and largest value, ignoring NaN. `None` for an all-NaN plane.
    pub fn bounds(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl SnapshotSeries {
    /// Decodes the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, setting: &SnapshotSetting) -> Result<SnapshotSeries> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .chain_err(|| ErrorKind::MissingInput(path.display().to_string()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let series = SnapshotSeries::decode(&bytes, setting)?;
        info!(
            "detected {} snapshots in file {:?}",
            series.len(),
            path
        );
        if series.len() != setting.expected_snapshots() {
            warn!(
                "expected {} snapshots ({} steps every {}), found {}",
                setting.expected_snapshots(),
                setting.steps,
                setting.interval,
                series.len()
            );
        }
        Ok(series)
    }

    /// Decodes an in-memory dump. Fails unless `bytes` holds a whole number
    /// of cubes.
    pub fn decode(bytes: &[u8], setting: &SnapshotSetting) -> Result<SnapshotSeries> {
        let cube_bytes = match setting.cube_bytes() {
            Some(c) if c > 0 => c,
            _ => bail!(ErrorKind::InvalidSetting(format!(
                "snapshot edge {} gives no usable cube size",
                setting.edge
            ))),
        };
        let size = bytes.len() as u64;
        if size % cube_bytes != 0 {
            bail!(ErrorKind::TruncatedSnapshotFile(size, cube_bytes));
        }

        let n = setting.edge;
        let snapshots = bytes
            .chunks(cube_bytes as usize)
            .map(|chunk| {
                let mut data = vec![0f32; n * n * n];
                LittleEndian::read_f32_into(chunk, &mut data);
                Snapshot {
                    edge: n,
                    data: data,
                }
            })
            .collect::<Vec<_>>();
        trace!("decoded {} cubes of {} bytes", snapshots.len(), cube_bytes);

        Ok(SnapshotSeries {
            setting: *setting,
            snapshots: snapshots,
        })
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true for an empty file.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The `index`-th snapshot.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Snapshots in file order.
    pub fn iter<'a>(&'a self) -> ::std::slice::Iter<'a, Snapshot> {
        self.snapshots.iter()
    }

    /// Layout the series was decoded with.
    pub fn setting(&self) -> &SnapshotSetting {
        &self.setting
    }
}
