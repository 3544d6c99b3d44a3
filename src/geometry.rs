use crate::*;

/// An open or closed line through point ids.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<u32>")]
pub struct Polyline(Vec<u32>);

impl Polyline {
    /// A polyline needs at least 2 points.
    pub fn new(ids: Vec<u32>) -> Result<Self> {
        if ids.len() < 2 {
            return Err(Error::ShortPolyline(ids.len()));
        }
        Ok(Self(ids))
    }

    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    /// Consecutive id pairs `(i - 1, i)`.
    pub fn segments(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        self.0.windows(2).map(|w| [w[0], w[1]])
    }

    pub fn is_closed(&self) -> bool {
        self.0.first() == self.0.last()
    }
}

impl TryFrom<Vec<u32>> for Polyline {
    type Error = Error;

    fn try_from(ids: Vec<u32>) -> Result<Self> {
        Self::new(ids)
    }
}

/// A triangulated surface over point ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Surface(pub Vec<[u32; 3]>);

impl Surface {
    pub fn tris(&self) -> &[[u32; 3]] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named set of points, with polylines and surfaces referencing them by index.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "GeometryData", try_from = "GeometryData")]
pub struct Geometry {
    pub name: String,
    points: Vec<Point3>,
    polylines: Vec<Polyline>,
    surfaces: Vec<Surface>,
}

impl Geometry {
    /// Build a geometry, checking every referenced point exists.
    pub fn new(
        name: impl Into<String>,
        points: Vec<Point3>,
        polylines: Vec<Polyline>,
        surfaces: Vec<Surface>,
    ) -> Result<Self> {
        let len = points.len();
        let ids = polylines
            .iter()
            .flat_map(|p| p.ids())
            .chain(surfaces.iter().flat_map(|s| s.tris().iter().flatten()));
        for &id in ids {
            if id as usize >= len {
                return Err(Error::DanglingPoint { id, len });
            }
        }

        Ok(Self {
            name: name.into(),
            points,
            polylines,
            surfaces,
        })
    }

    /// A geometry of points only.
    pub fn from_points(name: impl Into<String>, points: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            points,
            polylines: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Moving points keeps ids valid, so mutable access is safe.
    pub fn points_mut(&mut self) -> &mut [Point3] {
        &mut self.points
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// The points of a polyline, in order.
    pub fn polyline_points<'a>(&'a self, line: &'a Polyline) -> impl Iterator<Item = Point3> + 'a {
        line.ids().iter().map(move |&i| self.points[i as usize])
    }
}

impl Aabb for Geometry {
    type Space = Point3;
    fn aabb(&self) -> Extents3 {
        self.points.iter().copied().collect()
    }
}

/// Serialised form of a [`Geometry`].
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GeometryData {
    pub name: String,
    pub points: Vec<Point3>,
    #[serde(default)]
    pub polylines: Vec<Polyline>,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
}

impl From<Geometry> for GeometryData {
    fn from(geo: Geometry) -> Self {
        let Geometry {
            name,
            points,
            polylines,
            surfaces,
        } = geo;
        Self {
            name,
            points,
            polylines,
            surfaces,
        }
    }
}

impl TryFrom<GeometryData> for Geometry {
    type Error = Error;

    fn try_from(data: GeometryData) -> Result<Self> {
        let GeometryData {
            name,
            points,
            polylines,
            surfaces,
        } = data;
        Geometry::new(name, points, polylines, surfaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_ids() {
        let pts = vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        let line = Polyline::new(vec![0, 1, 2, 0]).unwrap();
        assert!(line.is_closed());
        assert_eq!(line.segments().count(), 3);

        let g = Geometry::new("a", pts.clone(), vec![line], vec![Surface(vec![[0, 1, 2]])]).unwrap();
        assert_eq!(
            g.polyline_points(&g.polylines()[0]).nth(2),
            Some([1.0, 1.0, 0.0])
        );

        let e = Geometry::new("b", pts.clone(), vec![], vec![Surface(vec![[0, 1, 3]])]);
        assert_eq!(e.unwrap_err(), Error::DanglingPoint { id: 3, len: 3 });

        let line = Polyline::new(vec![0, 7]).unwrap();
        assert!(Geometry::new("c", pts, vec![line], vec![]).is_err());

        assert_eq!(Polyline::new(vec![1]).unwrap_err(), Error::ShortPolyline(1));
    }

    #[test]
    fn geometry_data_is_validated() {
        let g = Geometry::new(
            "a",
            vec![[0.0; 3], [1.0, 0.0, 0.0]],
            vec![Polyline::new(vec![0, 1]).unwrap()],
            vec![],
        )
        .unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(serde_json::from_str::<Geometry>(&json).unwrap(), g);

        let dangling = r#"{"name":"b","points":[[0,0,0],[1,0,0]],"polylines":[[0,9]]}"#;
        assert!(serde_json::from_str::<Geometry>(dangling).is_err());

        let short = r#"{"name":"c","points":[[0,0,0]],"polylines":[[0]]}"#;
        assert!(serde_json::from_str::<Geometry>(short).is_err());
    }
}
