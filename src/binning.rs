use crate::*;
use rayon::prelude::*;

/// A measurement at a position.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    pub position: Point3,
    pub value: f64,
    /// Optional identifier carried from the source data.
    #[serde(default)]
    pub id: Option<u32>,
}

impl Sample {
    /// A sample at plan position `(x, y)`, with zero elevation.
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self {
            position: [x, y, 0.0],
            value,
            id: None,
        }
    }

    pub fn at(position: Point3, value: f64) -> Self {
        Self {
            position,
            value,
            id: None,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

/// How samples are projected and located.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BinningOptions {
    /// A point on the projection plane.
    pub plane_point: Point3,
    /// The projection plane normal, does not need to be a unit vector.
    pub plane_normal: Point3,
    /// Spatial grid density, see [`SpatialGrid::with_density`].
    pub points_per_cell: usize,
}

impl Default for BinningOptions {
    fn default() -> Self {
        Self {
            plane_point: [0.0; 3],
            plane_normal: [0.0, 0.0, -1.0],
            points_per_cell: POINTS_PER_CELL,
        }
    }
}

impl BinningOptions {
    pub fn plane(&self) -> Result<Plane> {
        Plane::new(self.plane_point, self.plane_normal)
    }

    /// Flatten `mesh` and index it for locating samples.
    pub fn locator(&self, mesh: &Mesh) -> Result<CellLocator> {
        CellLocator::new(mesh, self.plane()?, self.points_per_cell)
    }
}

/// Running sum and count per cell.
#[derive(Debug, Clone)]
pub struct CellAccumulator {
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl CellAccumulator {
    pub fn new(cells: usize) -> Self {
        Self {
            sums: vec![0.0; cells],
            counts: vec![0; cells],
        }
    }

    /// # Panics
    /// Panics if `cell` is out of bounds.
    pub fn add(&mut self, cell: usize, value: f64) {
        self.sums[cell] += value;
        self.counts[cell] += 1;
    }

    /// Consume the accumulator, averaging each cell. Empty cells are `0.0`.
    pub fn finish(self, dropped: usize) -> Binned {
        let Self { sums, counts } = self;
        let values = sums
            .into_iter()
            .zip(&counts)
            .map(|(s, &n)| if n == 0 { 0.0 } else { s / n as f64 })
            .collect();

        Binned {
            values,
            counts,
            dropped,
        }
    }
}

/// Per cell averages of binned samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned {
    /// Mean sample value per cell, `0.0` where no sample landed.
    pub values: Vec<f64>,
    /// Number of samples per cell.
    pub counts: Vec<usize>,
    /// Samples that did not land in any cell.
    pub dropped: usize,
}

impl Binned {
    /// Total number of samples binned into a cell.
    pub fn binned(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Store the values on `mesh` as a float cell array.
    pub fn attach(&self, mesh: &mut Mesh, name: impl Into<String>) -> Result<()> {
        mesh.add_cell_array(name, CellArray::Float(self.values.clone()))
    }
}

impl CellLocator {
    /// Average `samples` into the cells of the located mesh.
    pub fn bin(&self, samples: &[Sample]) -> Binned {
        self.accumulate(samples.iter().map(|s| (self.locate(s.position), s.value)))
    }

    /// As [`CellLocator::bin`], locating samples in parallel.
    ///
    /// Values are summed in sample order, so the result matches [`CellLocator::bin`] exactly.
    pub fn bin_par(&self, samples: &[Sample]) -> Binned {
        let located = samples
            .par_iter()
            .map(|s| (self.locate(s.position), s.value))
            .collect::<Vec<_>>();
        self.accumulate(located)
    }

    fn accumulate<I>(&self, located: I) -> Binned
    where
        I: IntoIterator<Item = (Option<usize>, f64)>,
    {
        let mut acc = CellAccumulator::new(self.flat().cell_len());
        let mut dropped = 0;
        for (cell, value) in located {
            match cell {
                Some(c) => acc.add(c, value),
                None => dropped += 1,
            }
        }

        let binned = acc.finish(dropped);
        if dropped > 0 {
            log::debug!(
                "{} of {} samples fell outside the mesh",
                dropped,
                dropped + binned.binned()
            );
        }
        binned
    }
}

/// Bin `samples` into the cells of `mesh` using the default [`BinningOptions`].
///
/// Each sample is projected onto the plane through the origin with normal `(0, 0, -1)`, assigned
/// to the first cell (by index) containing it among the cells of its nearest node, and averaged.
/// Samples with no containing cell are counted in [`Binned::dropped`].
pub fn bin(mesh: &Mesh, samples: &[Sample]) -> Result<Binned> {
    bin_with(mesh, samples, &BinningOptions::default())
}

pub fn bin_with(mesh: &Mesh, samples: &[Sample], options: &BinningOptions) -> Result<Binned> {
    Ok(options.locator(mesh)?.bin(samples))
}

/// Parallel [`bin_with`].
pub fn bin_par(mesh: &Mesh, samples: &[Sample], options: &BinningOptions) -> Result<Binned> {
    Ok(options.locator(mesh)?.bin_par(samples))
}
