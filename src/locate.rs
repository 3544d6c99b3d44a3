use crate::*;

/// Finds the cell of a mesh lying under a point.
///
/// The mesh is flattened onto a plane and a [`SpatialGrid`] is built over the flat nodes. A query
/// is projected onto the same plane, seeded with the nearest node, and tested against the cells
/// using that node in the plane's local coordinates. The first containing cell (in cell order) wins.
///
/// This is an approximation: a point whose containing cell does not use the nearest node is not
/// found. It holds up when the point density is high relative to the cell size.
#[derive(Debug, Clone)]
pub struct CellLocator {
    flat: Mesh,
    plane: Plane,
    grid: SpatialGrid,
}

impl CellLocator {
    pub fn new(mesh: &Mesh, plane: Plane, points_per_cell: usize) -> Result<Self> {
        if mesh.node_len() == 0 {
            return Err(Error::EmptyInput("mesh"));
        }

        let flat = mesh.flatten(&plane);
        let grid = SpatialGrid::with_density(flat.nodes(), points_per_cell)?;

        Ok(Self { flat, plane, grid })
    }

    /// A locator over the mesh's plan view (projected onto `z = 0`).
    pub fn plan(mesh: &Mesh) -> Result<Self> {
        Self::new(mesh, Plane::horizontal(0.0), POINTS_PER_CELL)
    }

    /// The flattened copy of the mesh, sharing cell indices with the source.
    pub fn flat(&self) -> &Mesh {
        &self.flat
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// The cell containing `p` once projected, if any.
    pub fn locate(&self, p: Point3) -> Option<usize> {
        if !p.is_finite() {
            return None;
        }

        let p = self.plane.project(p);
        let node = self.grid.nearest(p);
        self.flat
            .cells_of(node)
            .iter()
            .map(|&c| c as usize)
            .find(|&c| self.flat.cell_contains_on(c, &self.plane, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locating_cells() {
        let l = CellLocator::plan(&dummy_mesh()).unwrap();
        assert_eq!(l.locate([0.5, 0.5, 0.0]), Some(0));
        assert_eq!(l.locate([1.5, 0.5, 9.0]), Some(1));
        assert_eq!(l.locate([0.2, 1.7, -3.0]), Some(2));
        assert_eq!(l.locate([1.9, 1.9, 0.0]), Some(3));
        assert_eq!(l.locate([5.0, 5.0, 0.0]), None);
        assert_eq!(l.locate([f64::NAN, 0.5, 0.0]), None);
    }

    #[test]
    fn shared_edges_go_to_the_lower_cell() {
        let l = CellLocator::plan(&dummy_mesh()).unwrap();
        // on the edge between cells 0 and 1, nearest node 1 or 4
        assert_eq!(l.locate([1.0, 0.4, 0.0]), Some(0));
        // centre node, all four cells touch
        assert_eq!(l.locate([1.0, 1.0, 0.0]), Some(0));
    }

    #[test]
    fn locating_on_a_vertical_plane() {
        // 2x2 unit squares in the x-z plane at y = 3
        let nodes = (0..3)
            .flat_map(|z| (0..3).map(move |x| [x as f64, 3.0, z as f64]))
            .collect();
        let mesh =
            Mesh::from_polygons(nodes, [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]])
                .unwrap();
        let plane = Plane::new([0.0; 3], [0.0, 1.0, 0.0]).unwrap();
        let l = CellLocator::new(&mesh, plane, POINTS_PER_CELL).unwrap();

        assert_eq!(l.locate([0.5, 3.0, 0.5]), Some(0));
        assert_eq!(l.locate([1.5, -7.0, 0.5]), Some(1));
        assert_eq!(l.locate([0.5, 3.0, 1.5]), Some(2));
        assert_eq!(l.locate([0.5, 3.0, 2.5]), None);
    }

    #[test]
    fn empty_mesh() {
        let mesh = Mesh::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(
            CellLocator::plan(&mesh).unwrap_err(),
            Error::EmptyInput("mesh")
        );
    }
}
