use crate::*;

/// Extrude the outlines and footprints of `geometry` upwards by `height`.
///
/// With `n` input points, the result holds the original points followed by copies raised by
/// `height` (point `i` is raised to `i + n`). Polylines are kept. Surfaces are the original
/// footprints, then one wall per polyline, then one roof per footprint.
///
/// Each polyline segment `i - 1 -> i` makes two wall triangles,
/// `(i, i - 1, i - 1 + n)` and `(i, i - 1 + n, i + n)`.
pub fn extrude(geometry: &Geometry, height: f64, name: impl Into<String>) -> Result<Geometry> {
    if !height.is_finite() {
        return Err(Error::NonFinite("extrusion height"));
    }

    let pts = geometry.points();
    let n = pts.len() as u32;

    let points = pts
        .iter()
        .copied()
        .chain(pts.iter().map(|&[x, y, z]| [x, y, z + height]))
        .collect();

    let walls = geometry.polylines().iter().map(|line| {
        let tris = line
            .segments()
            .flat_map(|[a, b]| [[b, a, a + n], [b, a + n, b + n]])
            .collect();
        Surface(tris)
    });

    let roofs = geometry
        .surfaces()
        .iter()
        .map(|s| Surface(s.tris().iter().map(|t| t.map(|i| i + n)).collect()));

    let surfaces = geometry
        .surfaces()
        .iter()
        .cloned()
        .chain(walls)
        .chain(roofs)
        .collect::<Vec<_>>();

    log::debug!(
        "extruded {} outlines and {} footprints",
        geometry.polylines().len(),
        geometry.surfaces().len()
    );

    Geometry::new(name, points, geometry.polylines().to_vec(), surfaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        let pts = vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let outline = Polyline::new(vec![0, 1, 2, 3, 0]).unwrap();
        let footprint = Surface(vec![[0, 1, 2], [0, 2, 3]]);
        Geometry::new("plan", pts, vec![outline], vec![footprint]).unwrap()
    }

    #[test]
    fn extruding_a_square() {
        let g = extrude(&square(), 10.0, "house").unwrap();
        assert_eq!(g.name, "house");
        assert_eq!(g.points().len(), 8);
        assert_eq!(g.points()[6], [1.0, 1.0, 10.0]);
        assert_eq!(g.polylines(), square().polylines());

        // footprint, walls, roof
        assert_eq!(g.surfaces().len(), 3);
        assert_eq!(g.surfaces()[0], square().surfaces()[0]);

        let walls = g.surfaces()[1].tris();
        assert_eq!(walls.len(), 8);
        assert_eq!(walls[0], [1, 0, 4]);
        assert_eq!(walls[1], [1, 4, 5]);
        assert_eq!(walls[7], [0, 7, 4]);

        assert_eq!(g.surfaces()[2].tris(), &[[4, 5, 6], [4, 6, 7]]);
    }

    #[test]
    fn points_only() {
        let g = Geometry::from_points("p", vec![[1.0, 2.0, 3.0]]);
        let g = extrude(&g, -1.0, "q").unwrap();
        assert_eq!(g.points(), &[[1.0, 2.0, 3.0], [1.0, 2.0, 2.0]]);
        assert!(g.surfaces().is_empty());
    }

    #[test]
    fn bad_height() {
        assert_eq!(
            extrude(&square(), f64::NAN, "x").unwrap_err(),
            Error::NonFinite("extrusion height")
        );
    }
}
