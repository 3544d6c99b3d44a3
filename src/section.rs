use crate::*;

/// Build a layered vertical section.
///
/// The section runs along the columns `(xs[c], ys[c])` and is cut horizontally at the layer
/// elevations `zs`. Nodes are row-major, node `r * xs.len() + c` is `(xs[c], ys[c], zs[r])`.
/// Every layer pair and column pair forms a quad, with the layer index as its material id.
///
/// ```text
/// (r+1,c) --- (r+1,c+1)
///    |            |
///  (r,c) ----- (r,c+1)
/// ```
pub fn section_mesh(xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<Mesh> {
    if xs.len() != ys.len() {
        return Err(Error::LengthMismatch {
            what: "section column coordinates",
            a: xs.len(),
            b: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(Error::EmptyInput("section columns"));
    }
    if zs.len() < 2 {
        return Err(Error::EmptyInput("section layers"));
    }
    if !xs.iter().chain(ys).chain(zs).all(|x| x.is_finite()) {
        return Err(Error::NonFinite("section coordinate"));
    }

    let cols = xs.len();
    let nodes = zs
        .iter()
        .flat_map(|&z| xs.iter().zip(ys).map(move |(&x, &y)| [x, y, z]))
        .collect();

    let idx = |r: usize, c: usize| (r * cols + c) as u32;
    let mut cells = Vec::with_capacity((zs.len() - 1) * (cols - 1));
    let mut materials = Vec::with_capacity(cells.capacity());
    for r in 0..zs.len() - 1 {
        for c in 0..cols - 1 {
            cells.push(Cell::Quad([
                idx(r, c),
                idx(r + 1, c),
                idx(r + 1, c + 1),
                idx(r, c + 1),
            ]));
            materials.push(r as i64);
        }
    }

    let mut mesh = Mesh::new(nodes, cells)?;
    mesh.add_cell_array(MATERIAL_IDS, CellArray::Int(materials))?;
    Ok(mesh)
}
