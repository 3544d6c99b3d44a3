use crate::*;

/// One ERT measurement: a depth interval between two electrodes.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErtRecord {
    /// First electrode (E, N, H).
    pub e1: Point3,
    /// Second electrode (E, N, H).
    pub e2: Point3,
    /// Depth of the interval top below the electrodes.
    pub z1: f64,
    /// Depth of the interval bottom below the electrodes.
    pub z2: f64,
}

impl ErtRecord {
    fn is_finite(&self) -> bool {
        self.e1.is_finite() && self.e2.is_finite() && self.z1.is_finite() && self.z2.is_finite()
    }
}

/// Build a vertical quad mesh from ERT records.
///
/// Each record becomes one quad with its own four nodes, spanning from the top to the bottom of
/// the interval between both electrodes. Records are expected in profile order, consecutive
/// records sharing the same top depth are one layer: the material id starts at 0 and increments
/// each time `z1` changes.
///
/// With a `dem`, the electrode elevations are replaced with the DEM surface. Electrodes
/// outside the DEM keep their recorded elevation.
pub fn ert_mesh(records: &[ErtRecord], dem: Option<&Raster>) -> Result<Mesh> {
    if records.is_empty() {
        return Err(Error::EmptyInput("ERT records"));
    }
    if !records.iter().all(ErtRecord::is_finite) {
        return Err(Error::NonFinite("ERT record"));
    }

    let surface = |e: Point3| match dem {
        None => e[2],
        Some(dem) => dem.interpolate(e).unwrap_or_else(|| {
            log::warn!(
                "electrode at ({}, {}) is outside the DEM, using recorded elevation",
                e[0],
                e[1]
            );
            e[2]
        }),
    };

    let mut nodes = Vec::with_capacity(records.len() * 4);
    let mut cells = Vec::with_capacity(records.len());
    let mut materials = Vec::with_capacity(records.len());
    let mut mat = 0;

    for (i, r) in records.iter().enumerate() {
        let (h1, h2) = (surface(r.e1), surface(r.e2));
        let n = nodes.len() as u32;
        nodes.extend([
            r.e1.with_z(h1 - r.z1),
            r.e1.with_z(h1 - r.z2),
            r.e2.with_z(h2 - r.z2),
            r.e2.with_z(h2 - r.z1),
        ]);
        cells.push(Cell::Quad([n, n + 1, n + 2, n + 3]));

        if i > 0 && r.z1 != records[i - 1].z1 {
            mat += 1;
        }
        materials.push(mat);
    }

    log::debug!("ERT mesh with {} cells in {} layers", cells.len(), mat + 1);

    let mut mesh = Mesh::new(nodes, cells)?;
    mesh.add_cell_array(MATERIAL_IDS, CellArray::Int(materials))?;
    Ok(mesh)
}
