use crate::*;

pub type Extents2 = Extents<Point2>;
pub type Extents3 = Extents<Point3>;

/// An axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extents<P> {
    pub origin: P,
    pub size: P,
}

impl<P> Extents<P>
where
    P: Copy + Point + Add,
{
    pub fn zero() -> Self {
        Self {
            origin: P::zero(),
            size: P::zero(),
        }
    }

    pub fn from_min_max(min: P, max: P) -> Self {
        let size = max.sub(min);

        Self { origin: min, size }
    }

    pub fn max(&self) -> P {
        self.origin.add(self.size)
    }
}

impl<P> FromIterator<P> for Extents<P>
where
    P: Copy + Point + Add,
{
    /// The bounding box of the points. An empty iterator gives [`Extents::zero`].
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = P>,
    {
        let mut iter = iter.into_iter();
        let Some(init) = iter.next() else {
            return Self::zero();
        };

        let (min, max) = iter.fold((init, init), |(min, max), p| {
            (min.min_all(p), max.max_all(p))
        });

        Self::from_min_max(min, max)
    }
}

impl<P> Envelops<P> for Extents<P>
where
    P: Copy + Point + Add,
{
    fn envelops(&self, p: P) -> bool {
        let lower = self.origin.into_iter().zip(p).all(|(o, x)| o <= x);
        lower && p.into_iter().zip(self.max()).all(|(x, m)| x <= m)
    }
}

pub trait Aabb {
    type Space;

    fn aabb(&self) -> Extents<Self::Space>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    #[test]
    fn from_points() {
        let e = Extents3::from_iter([[1.0, 2.0, 3.0], [-1.0, 5.0, 3.0], [0.0, 0.0, 4.0]]);
        assert_eq!(e.origin, [-1.0, 0.0, 3.0]);
        assert_eq!(e.max(), [1.0, 5.0, 4.0]);

        let e = Extents2::from_iter(std::iter::empty());
        assert_eq!(e, Extents2::zero());
    }

    #[test]
    fn envelops_boundary() {
        let e = Extents2::from_min_max([0.0, 0.0], [1.0, 1.0]);
        assert!(e.envelops([0.0, 0.0]));
        assert!(e.envelops([1.0, 1.0]));
        assert!(!e.envelops([1.0, 1.1]));
        assert!(!e.envelops([-0.1, 0.5]));
    }

    #[quickcheck]
    fn bounding_box_envelops_its_points(pts: Vec<(f64, f64, f64)>) -> TestResult {
        let pts = pts.into_iter().map(|(x, y, z)| [x, y, z]).collect::<Vec<_>>();
        if pts.is_empty() || !pts.iter().all(|p| p.map(f64::abs).iter().all(|&x| x < 1e100)) {
            return TestResult::discard();
        }

        let e = pts.iter().copied().collect::<Extents3>();
        TestResult::from_bool(pts.iter().all(|&p| e.envelops(p)))
    }
}
