use crate::*;

/// Average number of points a [`SpatialGrid`] cell is sized for.
pub const POINTS_PER_CELL: usize = 8;

/// A uniform grid over a fixed point set, answering nearest point queries.
///
/// The grid is read only: changing the points means building a new grid.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    points: Vec<Point3>,
    extents: Extents3,
    /// Cell count per axis, an axis without extent has a single cell.
    dims: [usize; 3],
    cell_size: Point3,
    /// The smallest cell side over the axes with more than one cell.
    min_side: f64,
    /// Cell `i` holds the points `items[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<usize>,
    items: Vec<u32>,
}

impl SpatialGrid {
    /// Build a grid with [`POINTS_PER_CELL`] density.
    pub fn new(points: &[Point3]) -> Result<Self> {
        Self::with_density(points, POINTS_PER_CELL)
    }

    /// Build a grid sized so each cell holds about `per_cell` points.
    pub fn with_density(points: &[Point3], per_cell: usize) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput("spatial grid"));
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(Error::NonFinite("spatial grid point"));
        }

        let extents = points.iter().copied().collect::<Extents3>();
        let cells = (points.len() as f64 / per_cell.max(1) as f64).ceil();
        let dims = dimensions(extents.size, cells);

        let mut cell_size = Point3::zero();
        let mut min_side = f64::INFINITY;
        for a in 0..3 {
            cell_size[a] = extents.size[a] / dims[a] as f64;
            if dims[a] > 1 {
                min_side = min_side.min(cell_size[a]);
            }
        }

        let mut grid = Self {
            points: points.to_vec(),
            extents,
            dims,
            cell_size,
            min_side,
            offsets: Vec::new(),
            items: Vec::new(),
        };
        grid.bucket();

        log::debug!(
            "spatial grid over {} points with {:?} cells",
            grid.points.len(),
            grid.dims
        );

        Ok(grid)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn extents(&self) -> Extents3 {
        self.extents
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// The index of the point closest to `query`.
    ///
    /// Queries outside the grid start from the nearest boundary cell. Ties go to the first point
    /// found.
    pub fn nearest(&self, query: Point3) -> usize {
        let c = self.coord(query);
        let max_ring = (0..3)
            .map(|a| c[a].max(self.dims[a] - 1 - c[a]))
            .max()
            .unwrap_or_default();

        let mut best: Option<(f64, u32)> = None;
        for k in 0..=max_ring {
            if let Some((d, _)) = best {
                // every cell in ring k is at least k - 1 cell sides away
                let bound = k.saturating_sub(1) as f64 * self.min_side;
                if bound * bound > d {
                    break;
                }
            }

            self.ring(c, k, |cell| {
                for &i in self.bucket_of(cell) {
                    let d = dist_sq(self.points[i as usize], query);
                    if best.map_or(true, |(b, _)| d < b) {
                        best = Some((d, i));
                    }
                }
            });
        }

        best.map(|(_, i)| i as usize)
            .expect("a non-empty grid always has a nearest point")
    }

    /// The cell coordinates of `p`, clamped into the grid.
    fn coord(&self, p: Point3) -> [usize; 3] {
        let mut c = [0; 3];
        for a in 0..3 {
            if self.dims[a] > 1 {
                let i = ((p[a] - self.extents.origin[a]) / self.cell_size[a]).floor();
                // NaN falls to the first cell
                c[a] = if i > 0.0 {
                    (i as usize).min(self.dims[a] - 1)
                } else {
                    0
                };
            }
        }
        c
    }

    fn cell_idx(&self, [x, y, z]: [usize; 3]) -> usize {
        let [dx, dy, _] = self.dims;
        (z * dy + y) * dx + x
    }

    fn bucket_of(&self, cell: usize) -> &[u32] {
        &self.items[self.offsets[cell]..self.offsets[cell + 1]]
    }

    /// Visit the cells at Chebyshev distance `k` from `c`.
    fn ring<F: FnMut(usize)>(&self, c: [usize; 3], k: usize, mut f: F) {
        if k == 0 {
            f(self.cell_idx(c));
            return;
        }

        let range = |a: usize| {
            let lo = c[a].saturating_sub(k);
            let hi = (c[a] + k).min(self.dims[a] - 1);
            lo..=hi
        };

        for z in range(2) {
            for y in range(1) {
                for x in range(0) {
                    let off = [x.abs_diff(c[0]), y.abs_diff(c[1]), z.abs_diff(c[2])];
                    if off.into_iter().max() == Some(k) {
                        f(self.cell_idx([x, y, z]));
                    }
                }
            }
        }
    }

    fn bucket(&mut self) {
        let n = self.dims.into_iter().product::<usize>();
        let cells = self
            .points
            .iter()
            .map(|&p| self.cell_idx(self.coord(p)))
            .collect::<Vec<_>>();

        let mut offsets = vec![0usize; n + 1];
        for &c in &cells {
            offsets[c + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        let mut fill = offsets.clone();
        let mut items = vec![0u32; cells.len()];
        for (i, c) in cells.into_iter().enumerate() {
            items[fill[c]] = i as u32;
            fill[c] += 1;
        }

        self.offsets = offsets;
        self.items = items;
    }
}

/// Split `size` into about `cells` near cubic cells.
///
/// Axes thinner than a cell side get a single cell and the remaining axes share the cells.
fn dimensions(size: Point3, cells: f64) -> [usize; 3] {
    let mut dims = [1; 3];
    let mut active = (0..3).filter(|&a| size[a] > 0.0).collect::<Vec<_>>();

    while !active.is_empty() {
        let vol = active.iter().map(|&a| size[a]).product::<f64>();
        let side = (vol / cells).powf((active.len() as f64).recip());
        if !side.is_normal() {
            break;
        }

        match active.iter().position(|&a| size[a] < side) {
            Some(i) => {
                active.remove(i);
            }
            None => {
                for &a in &active {
                    dims[a] = ((size[a] / side).ceil() as usize).max(1);
                }
                break;
            }
        }
    }

    dims
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    fn brute_force(points: &[Point3], q: Point3) -> f64 {
        points
            .iter()
            .map(|&p| dist_sq(p, q))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn empty_grid_fails() {
        assert_eq!(
            SpatialGrid::new(&[]).unwrap_err(),
            Error::EmptyInput("spatial grid")
        );
        assert!(SpatialGrid::new(&[[f64::NAN, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn grid_dimensions() {
        // flat square, 100 cells
        assert_eq!(dimensions([10.0, 10.0, 0.0], 100.0), [10, 10, 1]);
        // a line
        assert_eq!(dimensions([0.0, 50.0, 0.0], 5.0), [1, 5, 1]);
        // a sliver does not get cells of its own
        assert_eq!(dimensions([1000.0, 1e-9, 0.0], 100.0), [100, 1, 1]);
        // a single point
        assert_eq!(dimensions([0.0; 3], 1.0), [1, 1, 1]);
    }

    #[test]
    fn nearest_on_a_lattice() {
        let pts = (0..10)
            .flat_map(|y| (0..10).map(move |x| [x as f64, y as f64, 0.0]))
            .collect::<Vec<_>>();
        let g = SpatialGrid::new(&pts).unwrap();
        assert!(g.dims().into_iter().product::<usize>() > 1);

        assert_eq!(g.nearest([0.1, 0.1, 0.0]), 0);
        assert_eq!(g.nearest([3.9, 5.2, 0.0]), 54);
        assert_eq!(g.nearest([9.0, 9.0, 0.0]), 99);
        // outside of the grid clamps to the boundary
        assert_eq!(g.nearest([-100.0, 4.2, 0.0]), 40);
        assert_eq!(g.nearest([100.0, 100.0, 5.0]), 99);
    }

    #[test]
    fn nearest_across_cell_boundaries() {
        // the closest point sits in a neighbouring cell
        let pts = vec![[0.0, 0.0, 0.0], [0.99, 0.0, 0.0], [1.01, 0.0, 0.0], [10.0, 10.0, 0.0]];
        let g = SpatialGrid::with_density(&pts, 1).unwrap();
        assert_eq!(g.nearest([1.05, 0.0, 0.0]), 2);
        assert_eq!(g.nearest([0.95, 0.0, 0.0]), 1);
        assert_eq!(g.nearest([6.0, 6.0, 0.0]), 3);
    }

    #[test]
    fn single_point_grid() {
        let g = SpatialGrid::new(&[[5.0, 5.0, 5.0]]).unwrap();
        assert_eq!(g.nearest([-1e9, 1e9, 0.0]), 0);
    }

    #[quickcheck]
    fn nearest_matches_brute_force(
        pts: Vec<(f64, f64, f64)>,
        q: (f64, f64),
        per_cell: u8,
    ) -> TestResult {
        let Some(pts) = pts
            .into_iter()
            .map(|(x, y, z)| [x, y, z])
            .map(|p| p.is_finite().then(|| p.map(|x| x % 1e4)))
            .collect::<Option<Vec<_>>>()
        else {
            return TestResult::discard();
        };
        let Some(q) = finite_p2(q) else {
            return TestResult::discard();
        };
        if pts.is_empty() {
            return TestResult::discard();
        }

        let q = q.with_z(0.0);
        let g = SpatialGrid::with_density(&pts, per_cell as usize % 10 + 1).unwrap();
        let i = g.nearest(q);

        TestResult::from_bool(dist_sq(pts[i], q) == brute_force(&pts, q))
    }
}
