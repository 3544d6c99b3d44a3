use crate::*;

/// A regular raster of elevations, such as a DEM.
///
/// Pixels are square and axis aligned. The origin is the lower-left corner of the raster, and
/// values are stored row-first starting at the bottom row. A `None` value is no-data.
///
/// > `PartialEq` is derived and is _exact_ on the float values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "RasterData", try_from = "RasterData")]
pub struct Raster {
    origin: Point2,
    x_count: usize,
    y_count: usize,
    spacing: f64,
    values: Vec<Option<f64>>,
}

impl Raster {
    /// Create a raster with every pixel set to no-data.
    pub fn new(origin: Point2, x_count: usize, y_count: usize, spacing: f64) -> Self {
        Self {
            origin,
            x_count,
            y_count,
            spacing,
            values: vec![None; x_count * y_count],
        }
    }

    /// Create a raster from row-first values, bottom row first.
    pub fn from_values(
        origin: Point2,
        x_count: usize,
        spacing: f64,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        if x_count == 0 || values.len() % x_count != 0 {
            return Err(Error::LengthMismatch {
                what: "raster row",
                a: x_count,
                b: values.len(),
            });
        }
        if !(spacing.is_finite() && spacing > 0.0) || !origin.is_finite() {
            return Err(Error::NonFinite("raster geometry"));
        }

        Ok(Self {
            origin,
            x_count,
            y_count: values.len() / x_count,
            spacing,
            values,
        })
    }

    /// The lower-left corner.
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    pub fn x_count(&self) -> usize {
        self.x_count
    }

    pub fn y_count(&self) -> usize {
        self.y_count
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// The raw values, row-first from the bottom row.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// The number of pixels, **including** no-data.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The 2D plan extents covered by the pixels.
    pub fn extents(&self) -> Extents2 {
        let size = [self.x_count, self.y_count].map(|x| x as f64 * self.spacing);
        Extents {
            origin: self.origin,
            size,
        }
    }

    /// The centre of pixel `x, y`.
    pub fn cell_centre(&self, x: usize, y: usize) -> Point2 {
        let to = [x as f64 + 0.5, y as f64 + 0.5];
        self.origin.add(to.scale(self.spacing))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.values[self.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: impl Into<Option<f64>>) {
        let i = self.idx(x, y);
        self.values[i] = z.into();
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        if x >= self.x_count {
            panic!("x value '{}' is outside raster bounds", x);
        }
        if y >= self.y_count {
            panic!("y value '{}' is outside raster bounds", y);
        }

        y * self.x_count + x
    }

    /// The pixel containing `p`, if inside the raster.
    ///
    /// The upper and right edges belong to the last pixels.
    pub fn pixel_of(&self, p: impl ToPoint2) -> Option<(usize, usize)> {
        let [x, y] = p.to_p2().sub(self.origin).scale(self.spacing.recip());
        let ix = pixel_index(x, self.x_count)?;
        let iy = pixel_index(y, self.y_count)?;
        Some((ix, iy))
    }

    /// The value of the pixel containing `p`.
    pub fn value_at(&self, p: impl ToPoint2) -> Option<f64> {
        let (x, y) = self.pixel_of(p)?;
        self.get(x, y)
    }

    /// Bilinear interpolation over the pixel centres surrounding `p`.
    ///
    /// No-data neighbours are left out and the remaining weights rescaled. Within half a pixel of
    /// the border there are no four surrounding centres, there the containing pixel's value is
    /// used.
    pub fn interpolate(&self, p: impl ToPoint2) -> Option<f64> {
        let p = p.to_p2();
        let [u, v] = p
            .sub(self.origin)
            .scale(self.spacing.recip())
            .map(|a| a - 0.5);
        let (x0, y0) = (u.floor(), v.floor());

        let inside = x0 >= 0.0
            && y0 >= 0.0
            && x0 + 1.0 < self.x_count as f64
            && y0 + 1.0 < self.y_count as f64;
        if !inside {
            return self.value_at(p);
        }

        let (fx, fy) = (u - x0, v - y0);
        let (x0, y0) = (x0 as usize, y0 as usize);
        let corners = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x0 + 1, y0, fx * (1.0 - fy)),
            (x0, y0 + 1, (1.0 - fx) * fy),
            (x0 + 1, y0 + 1, fx * fy),
        ];

        let (sum, wsum) = corners
            .into_iter()
            .filter_map(|(x, y, w)| self.get(x, y).map(|z| (z * w, w)))
            .fold((0.0, 0.0), |(s, t), (z, w)| (s + z, t + w));

        if wsum > 0.0 {
            Some(sum / wsum)
        } else {
            self.value_at(p)
        }
    }

    /// The pixel centres with data, as 3D points.
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        (0..self.y_count)
            .flat_map(move |y| (0..self.x_count).map(move |x| (x, y)))
            .filter_map(move |(x, y)| self.get(x, y).map(|z| self.cell_centre(x, y).with_z(z)))
    }
}

fn pixel_index(a: f64, count: usize) -> Option<usize> {
    let n = count as f64;
    if !(0.0..=n).contains(&a) || count == 0 {
        None
    } else {
        Some((a.floor() as usize).min(count - 1))
    }
}

impl Aabb for Raster {
    type Space = Point2;
    fn aabb(&self) -> Extents2 {
        self.extents()
    }
}

/// Serialised form of a [`Raster`].
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RasterData {
    pub origin: Point2,
    pub x_count: usize,
    pub y_count: usize,
    pub spacing: f64,
    pub values: Vec<Option<f64>>,
}

impl From<Raster> for RasterData {
    fn from(raster: Raster) -> Self {
        let Raster {
            origin,
            x_count,
            y_count,
            spacing,
            values,
        } = raster;
        Self {
            origin,
            x_count,
            y_count,
            spacing,
            values,
        }
    }
}

impl TryFrom<RasterData> for Raster {
    type Error = Error;

    fn try_from(data: RasterData) -> Result<Self> {
        let RasterData {
            origin,
            x_count,
            y_count,
            spacing,
            values,
        } = data;

        let expected = x_count.checked_mul(y_count);
        if expected != Some(values.len()) {
            return Err(Error::LengthMismatch {
                what: "raster pixel",
                a: expected.unwrap_or(usize::MAX),
                b: values.len(),
            });
        }
        if !(spacing.is_finite() && spacing > 0.0) || !origin.is_finite() {
            return Err(Error::NonFinite("raster geometry"));
        }

        Ok(Self {
            origin,
            x_count,
            y_count,
            spacing,
            values,
        })
    }
}
