use crate::*;

/// Name of the integer cell array holding material (layer) ids.
pub const MATERIAL_IDS: &str = "MaterialIDs";

/// A mesh cell, referencing node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Cell {
    Tri([u32; 3]),
    Quad([u32; 4]),
}

impl Cell {
    /// The node indices, in winding order.
    pub fn nodes(&self) -> &[u32] {
        match self {
            Cell::Tri(x) => x,
            Cell::Quad(x) => x,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<&[u32]> for Cell {
    type Error = Error;

    fn try_from(nodes: &[u32]) -> Result<Self> {
        match *nodes {
            [a, b, c] => Ok(Cell::Tri([a, b, c])),
            [a, b, c, d] => Ok(Cell::Quad([a, b, c, d])),
            _ if nodes.len() < 3 => Err(Error::DegenerateCell(nodes.len())),
            _ => Err(Error::UnsupportedCell(nodes.len())),
        }
    }
}

/// A named array holding one value per cell, in cell order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellArray {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl CellArray {
    pub fn len(&self) -> usize {
        match self {
            CellArray::Float(x) => x.len(),
            CellArray::Int(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            CellArray::Float(x) => Some(x),
            CellArray::Int(_) => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            CellArray::Int(x) => Some(x),
            CellArray::Float(_) => None,
        }
    }
}

/// A 2D cell mesh embedded in 3D.
///
/// The mesh owns its nodes and cells in contiguous storage. Cell topology is fixed at
/// construction, which also builds the node to cell adjacency.
///
/// Cell arrays are attached by name after construction and must hold one value per cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "MeshData", try_from = "MeshData")]
pub struct Mesh {
    nodes: Vec<Point3>,
    cells: Vec<Cell>,
    /// Node `i` is used by the cells `node_cells[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<usize>,
    /// Cell indices, ascending per node.
    node_cells: Vec<u32>,
    arrays: HashMap<String, CellArray>,
}

impl Mesh {
    /// Build a mesh, checking that every cell references existing nodes.
    pub fn new(nodes: Vec<Point3>, cells: Vec<Cell>) -> Result<Self> {
        let len = nodes.len();
        for (cell, c) in cells.iter().enumerate() {
            if let Some(&node) = c.nodes().iter().find(|&&n| n as usize >= len) {
                return Err(Error::DanglingNode { cell, node, len });
            }
        }

        let (offsets, node_cells) = adjacency(len, &cells);

        Ok(Self {
            nodes,
            cells,
            offsets,
            node_cells,
            arrays: HashMap::default(),
        })
    }

    /// Build a mesh from cells given as node index lists.
    pub fn from_polygons<I, C>(nodes: Vec<Point3>, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u32]>,
    {
        let cells = cells
            .into_iter()
            .map(|c| Cell::try_from(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(nodes, cells)
    }

    pub fn node_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn cell_len(&self) -> usize {
        self.cells.len()
    }

    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells using `node`, in ascending cell order.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn cells_of(&self, node: usize) -> &[u32] {
        &self.node_cells[self.offsets[node]..self.offsets[node + 1]]
    }

    /// The node coordinates of a cell.
    pub fn cell_points(&self, cell: usize) -> impl ExactSizeIterator<Item = Point3> + '_ {
        self.cells[cell]
            .nodes()
            .iter()
            .map(move |&n| self.nodes[n as usize])
    }

    /// The cell decomposed into a triangle fan about its first node.
    pub fn cell_tris(&self, cell: usize) -> impl Iterator<Item = [Point3; 3]> + '_ {
        fan(self.cells[cell].nodes()).map(move |t| t.map(|n| self.nodes[n as usize]))
    }

    /// Test if the plan position of `p` is inside (or on the boundary of) the cell.
    pub fn cell_contains(&self, cell: usize, p: impl ToPoint2) -> bool {
        let p = p.to_p2();
        self.cell_tris(cell)
            .any(|t| point_in_triangle(p, t.map(ToPoint2::to_p2)))
    }

    /// Test if `p` is inside (or on the boundary of) the cell, in the local coordinates of
    /// `plane`.
    ///
    /// Both the cell and `p` are expected to lie on the plane, as after [`Mesh::flatten`].
    pub fn cell_contains_on(&self, cell: usize, plane: &Plane, p: Point3) -> bool {
        let p = plane.to_local(p);
        self.cell_tris(cell)
            .any(|t| point_in_triangle(p, t.map(|q| plane.to_local(q))))
    }

    /// Attach a named cell array.
    ///
    /// Fails if the array does not hold one value per cell, or if the name is already used.
    pub fn add_cell_array(&mut self, name: impl Into<String>, array: CellArray) -> Result<()> {
        let name = name.into();
        if array.len() != self.cell_len() {
            return Err(Error::ArrayLength {
                name,
                expected: self.cell_len(),
                found: array.len(),
            });
        }

        if self.arrays.contains_key(&name) {
            return Err(Error::ArrayExists(name));
        }

        self.arrays.insert(name, array);
        Ok(())
    }

    pub fn cell_array(&self, name: &str) -> Option<&CellArray> {
        self.arrays.get(name)
    }

    pub fn cell_floats(&self, name: &str) -> Option<&[f64]> {
        self.cell_array(name).and_then(CellArray::as_floats)
    }

    pub fn cell_ints(&self, name: &str) -> Option<&[i64]> {
        self.cell_array(name).and_then(CellArray::as_ints)
    }

    pub fn remove_cell_array(&mut self, name: &str) -> Option<CellArray> {
        self.arrays.remove(name)
    }

    /// The names of the attached cell arrays, sorted.
    pub fn cell_array_names(&self) -> Vec<&str> {
        let mut names = self.arrays.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn material_ids(&self) -> Option<&[i64]> {
        self.cell_ints(MATERIAL_IDS)
    }

    /// Project every node onto `plane`.
    ///
    /// Node and cell order is preserved so cell indices of the flat copy refer to the same cells
    /// of this mesh. Cell arrays are not copied.
    pub fn flatten(&self, plane: &Plane) -> Mesh {
        let nodes = self.nodes.iter().map(|&p| plane.project(p)).collect();
        Mesh {
            nodes,
            cells: self.cells.clone(),
            offsets: self.offsets.clone(),
            node_cells: self.node_cells.clone(),
            arrays: HashMap::default(),
        }
    }
}

/// Project `mesh` onto the plane through `plane_point` with `plane_normal`.
///
/// See [`Mesh::flatten`]. Fails with [`Error::DegenerateProjection`] if the normal has no
/// direction.
pub fn flatten(mesh: &Mesh, plane_point: Point3, plane_normal: Point3) -> Result<Mesh> {
    let plane = Plane::new(plane_point, plane_normal)?;
    Ok(mesh.flatten(&plane))
}

fn adjacency(node_len: usize, cells: &[Cell]) -> (Vec<usize>, Vec<u32>) {
    let mut offsets = vec![0usize; node_len + 1];
    for c in cells {
        for &n in c.nodes() {
            offsets[n as usize + 1] += 1;
        }
    }

    for i in 0..node_len {
        offsets[i + 1] += offsets[i];
    }

    // fill in cell order, so each node's cells end up ascending
    let mut fill = offsets.clone();
    let mut node_cells = vec![0u32; offsets[node_len]];
    for (i, c) in cells.iter().enumerate() {
        for &n in c.nodes() {
            let slot = &mut fill[n as usize];
            node_cells[*slot] = i as u32;
            *slot += 1;
        }
    }

    (offsets, node_cells)
}

impl Aabb for Mesh {
    type Space = Point3;
    fn aabb(&self) -> Extents3 {
        self.nodes.iter().copied().collect()
    }
}

/// Serialised form of a [`Mesh`], without the derived adjacency.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MeshData {
    pub nodes: Vec<Point3>,
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub arrays: HashMap<String, CellArray>,
}

impl From<Mesh> for MeshData {
    fn from(mesh: Mesh) -> Self {
        let Mesh {
            nodes,
            cells,
            arrays,
            ..
        } = mesh;
        Self {
            nodes,
            cells,
            arrays,
        }
    }
}

impl TryFrom<MeshData> for Mesh {
    type Error = Error;

    fn try_from(data: MeshData) -> Result<Self> {
        let MeshData {
            nodes,
            cells,
            arrays,
        } = data;
        let mut mesh = Mesh::new(nodes, cells)?;
        for (name, array) in arrays {
            mesh.add_cell_array(name, array)?;
        }
        Ok(mesh)
    }
}
