use std::ops;

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Set all the values to this value.
    fn all(v: f64) -> Self;

    /// Set all values to zero.
    fn zero() -> Self {
        Self::all(0.)
    }

    /// Scale point by multiplying all dimensions by `scalar`.
    fn scale(self, scalar: f64) -> Self;

    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter().map(|a| a * a).sum::<f64>().sqrt()
    }

    /// Normalise the vector by the magnitude.
    fn unit(self) -> Self {
        self.scale(self.mag().recip())
    }

    /// Return the minimum of each dimension.
    fn min_all(self, b: Self) -> Self {
        self.xfm(b, f64::min)
    }

    /// Return the maximum of each dimension.
    fn max_all(self, b: Self) -> Self {
        self.xfm(b, f64::max)
    }

    /// Every dimension is neither NaN nor infinite.
    fn is_finite(self) -> bool {
        self.into_iter().all(f64::is_finite)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

pub trait Add<Rhs = Self> {
    fn add(self, rhs: Rhs) -> Self;
    fn sub(self, rhs: Rhs) -> Self
    where
        Self: Sized + Copy,
        Rhs: Point,
    {
        self.add(rhs.scale(-1.0))
    }
}

/// 2D Point (X,Y).
pub type Point2 = [f64; 2];

/// 3D Point (X,Y,Z).
pub type Point3 = [f64; 3];

impl Add for Point2 {
    fn add(self, rhs: Self) -> Self {
        self.xfm(rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        self.xfm(rhs, ops::Sub::sub)
    }
}
impl Point for Point2 {
    fn all(v: f64) -> Self {
        [v; 2]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, [bx, by]: Self, f: F) -> Self {
        let [ax, ay] = self;
        [f(ax, bx), f(ay, by)]
    }
}

impl Add for Point3 {
    fn add(self, rhs: Self) -> Self {
        self.xfm(rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        self.xfm(rhs, ops::Sub::sub)
    }
}
impl Point for Point3 {
    fn all(v: f64) -> Self {
        [v; 3]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, [bx, by, bz]: Self, f: F) -> Self {
        let [ax, ay, az] = self;
        [f(ax, bx), f(ay, by), f(az, bz)]
    }
}

pub trait ToPoint2 {
    fn to_p2(self) -> Point2;
}

impl ToPoint2 for Point2 {
    fn to_p2(self) -> Point2 {
        self
    }
}
impl ToPoint2 for &Point2 {
    fn to_p2(self) -> Point2 {
        *self
    }
}
impl ToPoint2 for Point3 {
    fn to_p2(self) -> Point2 {
        let [x, y, _] = self;
        [x, y]
    }
}
impl ToPoint2 for &Point3 {
    fn to_p2(self) -> Point2 {
        (*self).to_p2()
    }
}

pub trait WithZ: ToPoint2 + Sized {
    fn with_z(self, z: f64) -> Point3 {
        let [x, y] = self.to_p2();
        [x, y, z]
    }
}

impl WithZ for Point2 {}
impl WithZ for Point3 {}

pub fn dot_prod(a: Point3, b: Point3) -> f64 {
    a.into_iter().zip(b).map(|(a, b)| a * b).sum()
}

#[allow(clippy::many_single_char_names)]
pub fn xprod(a: Point3, b: Point3) -> Point3 {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let x = ay * bz - az * by;
    let y = az * bx - ax * bz;
    let z = ax * by - ay * bx;
    [x, y, z]
}

/// 2D cross product of `(b - a)` and `(p - a)`.
///
/// Positive when `p` is left of the directed line `a -> b`, negative when right, zero when
/// co-linear.
pub fn xprod2(a: Point2, b: Point2, p: Point2) -> f64 {
    let [ux, uy] = b.sub(a);
    let [vx, vy] = p.sub(a);
    ux * vy - uy * vx
}

/// Apply an ordering to points by testing each dimension in turn.
pub fn ordpt<P: Point>(a: P, b: P) -> std::cmp::Ordering {
    a.into_iter()
        .zip(b)
        .fold(std::cmp::Ordering::Equal, |o, (a, b)| o.then(a.total_cmp(&b)))
}

/// Squared euclidean distance.
pub fn dist_sq<P: Point + Add>(a: P, b: P) -> f64 {
    a.sub(b).into_iter().map(|x| x * x).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_adding() {
        let p = [0.0, 1.0].add([3.0, 1.0]);
        assert_eq!(p, [3.0, 2.0]);

        let p = [0.0, 1.0, 5.0].add([3.0, 1.0, 5.0]);
        assert_eq!(p, [3.0, 2.0, 10.0]);

        let p = [0.0, 1.0, 5.0].sub([3.0, 1.0, 5.0]);
        assert_eq!(p, [-3.0, 0.0, 0.0]);
    }

    #[test]
    fn with_z_replaces_z() {
        assert_eq!([1.0, 2.0].with_z(3.0), [1.0, 2.0, 3.0]);
        assert_eq!([1.0, 2.0, 9.0].with_z(0.0), [1.0, 2.0, 0.0]);
        assert_eq!([1.0, 2.0, 9.0].to_p2(), [1.0, 2.0]);
    }

    #[test]
    fn xproduct_test() {
        let v = xprod([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(v, [0.0, 0.0, 1.0]);

        assert!(xprod2([0.0, 0.0], [1.0, 0.0], [0.5, 1.0]) > 0.0);
        assert!(xprod2([0.0, 0.0], [1.0, 0.0], [0.5, -1.0]) < 0.0);
        assert_eq!(xprod2([0.0, 0.0], [1.0, 0.0], [3.0, 0.0]), 0.0);
    }

    #[test]
    fn mag_and_distance() {
        let m = [2.0, -3.0, 6.0].mag() - 7.0;
        assert!(m.abs() < 1e-11);

        assert_eq!(dist_sq([1.0, 1.0], [4.0, 5.0]), 25.0);
        assert_eq!([0.0, 0.0, 2.0].unit(), [0.0, 0.0, 1.0]);
        assert!(![f64::NAN, 0.0].is_finite());
    }
}
