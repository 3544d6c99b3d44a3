use crate::*;

/// Ax + By + Cz = D
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plane {
    d: f64,
    normal: Point3,
    centroid: Point3,
}

impl Plane {
    /// A plane through `centroid` with the given `normal`.
    ///
    /// The normal does not need to be a unit vector, but it must have a direction.
    pub fn new(centroid: Point3, normal: Point3) -> Result<Self> {
        let len = normal.mag();
        if !len.is_finite() || len == 0.0 || !centroid.is_finite() {
            return Err(Error::DegenerateProjection(normal));
        }

        let d = dot_prod(normal, centroid);
        Ok(Self {
            d,
            normal,
            centroid,
        })
    }

    /// The horizontal plane at elevation `z`.
    pub fn horizontal(z: f64) -> Self {
        let normal = [0.0, 0.0, 1.0];
        let centroid = [0.0, 0.0, z];
        Self {
            d: z,
            normal,
            centroid,
        }
    }

    /// The plane spanned by a triangle, `None` if the triangle has no area.
    pub fn from_tri([a, b, c]: [Point3; 3]) -> Option<Self> {
        Self::new(a, xprod(b.sub(a), c.sub(a))).ok()
    }

    pub fn a(&self) -> f64 {
        self.normal[0]
    }

    pub fn b(&self) -> f64 {
        self.normal[1]
    }

    pub fn c(&self) -> f64 {
        self.normal[2]
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn centroid(&self) -> Point3 {
        self.centroid
    }

    pub fn normal(&self) -> Point3 {
        self.normal
    }

    pub fn is_vertical(&self) -> bool {
        self.c() == 0.0
    }

    /// The elevation of the plane above `p`, `None` if the plane is vertical.
    pub fn register_z(&self, p: impl ToPoint2) -> Option<f64> {
        if self.is_vertical() {
            return None;
        }

        let [px, py] = p.to_p2();

        let i = self.d() - self.a() * px - self.b() * py;
        Some(i / self.c())
    }

    /// Returns the **point on the plane** that is the shortest distance from `p`.
    #[allow(clippy::many_single_char_names)]
    pub fn project(&self, [x, y, z]: Point3) -> Point3 {
        // finding t such that p + tN lies on the plane
        let [a, b, c] = self.normal;
        let t = (self.d - a * x - b * y - c * z) / (a * a + b * b + c * c);

        [x, y, z].add(self.normal.scale(t))
    }

    /// 2D coordinates of `p` within the plane.
    ///
    /// The axis the normal leans on most is dropped, which maps points on the plane one to one,
    /// so containment on the plane carries over. A horizontal plane keeps `x` and `y`.
    pub fn to_local(&self, [x, y, z]: Point3) -> Point2 {
        let [a, b, c] = self.normal.map(f64::abs);
        if c >= a && c >= b {
            [x, y]
        } else if b >= a {
            [x, z]
        } else {
            [y, z]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_normals() {
        let e = Plane::new([0.0; 3], [0.0; 3]).unwrap_err();
        assert_eq!(e, Error::DegenerateProjection([0.0; 3]));

        assert!(Plane::new([0.0; 3], [f64::NAN, 0.0, 1.0]).is_err());
        assert!(Plane::new([0.0; 3], [0.0, 0.0, -1.0]).is_ok());
    }

    #[test]
    fn projection_onto_horizontal() {
        let plane = Plane::new([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]).unwrap();
        assert_eq!(plane.project([3.0, 4.0, 12.5]), [3.0, 4.0, 0.0]);

        let plane = Plane::horizontal(2.0);
        assert_eq!(plane.project([3.0, 4.0, -1.0]), [3.0, 4.0, 2.0]);
        assert_eq!(plane.register_z([100.0, -4.0]), Some(2.0));
    }

    #[test]
    fn projection_onto_tilted() {
        // x = z
        let plane = Plane::new([0.0; 3], [1.0, 0.0, -1.0]).unwrap();
        let [x, y, z] = plane.project([2.0, 5.0, 0.0]);
        assert!((x - 1.0).abs() < 1e-11);
        assert!((y - 5.0).abs() < 1e-11);
        assert!((z - 1.0).abs() < 1e-11);
    }

    #[test]
    fn local_coordinates() {
        let p = [1.0, 2.0, 3.0];
        assert_eq!(Plane::horizontal(5.0).to_local(p), [1.0, 2.0]);
        assert_eq!(Plane::new([0.0; 3], [0.0, -1.0, 0.0]).unwrap().to_local(p), [1.0, 3.0]);
        assert_eq!(Plane::new([0.0; 3], [2.0, 1.0, 0.5]).unwrap().to_local(p), [2.0, 3.0]);
        // ties keep the plan view
        assert_eq!(Plane::new([0.0; 3], [1.0, 0.0, -1.0]).unwrap().to_local(p), [1.0, 2.0]);
    }

    #[test]
    fn triangle_planes() {
        let plane = Plane::from_tri([[0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 3.0]]).unwrap();
        let z = plane.register_z([0.5, 0.5]).unwrap();
        assert!((z - 2.5).abs() < 1e-11);

        assert_eq!(
            Plane::from_tri([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]),
            None
        );

        let wall = Plane::from_tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(wall.is_vertical());
        assert_eq!(wall.register_z([0.2, 0.0]), None);
    }
}
