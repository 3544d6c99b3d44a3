//! Point containment tests for triangles and convex cells.
use crate::*;

/// Triangle in plan.
pub type Tri2 = [Point2; 3];

/// Test if a point is _inside_ a triangle, boundary included.
///
/// Compares the signs of the three edge cross products against each other, so the triangle may be
/// wound either way. A zero-area triangle contains nothing.
pub fn point_in_triangle<P: ToPoint2>(p: P, [a, b, c]: Tri2) -> bool {
    if area_is_zero([a, b, c]) {
        return false;
    }

    let p = p.to_p2();
    let d1 = edge_side(a, b, p);
    let d2 = edge_side(b, c, p);
    let d3 = edge_side(c, a, p);

    let neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(neg && pos)
}

/// Side of `p` relative to `a -> b`.
///
/// Always evaluated from the lexicographically smaller end point so that `edge_side(b, a, p)` is
/// exactly `-edge_side(a, b, p)`.
fn edge_side(a: Point2, b: Point2, p: Point2) -> f64 {
    if ordpt(a, b).is_le() {
        xprod2(a, b, p)
    } else {
        -xprod2(b, a, p)
    }
}

fn area_is_zero(mut t: Tri2) -> bool {
    // sorting keeps the result independent of the vertex order
    t.sort_unstable_by(|&a, &b| ordpt(a, b));
    let [a, b, c] = t;
    xprod2(a, b, c) == 0.0
}

/// Fan triangulation about the first point: `n` points give `n - 2` triangles.
///
/// Fewer than 3 points give no triangles.
pub fn fan<T: Copy>(ps: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    let first = ps.first().copied();
    ps.windows(2)
        .skip(1)
        .filter_map(move |w| first.map(|a| [a, w[0], w[1]]))
}

/// Test if a point is _inside_ a polygonal cell by testing each triangle of its [`fan`].
///
/// The polygon needs to be convex (or at least star shaped about its first point) for the fan to
/// cover it.
pub fn point_in_polygon<P, O>(ps: &[P], point: O) -> Result<bool>
where
    P: ToPoint2 + Copy,
    O: ToPoint2,
{
    if ps.len() < 3 {
        return Err(Error::DegenerateCell(ps.len()));
    }

    let point = point.to_p2();
    Ok(fan(ps).any(|t| point_in_triangle(point, t.map(ToPoint2::to_p2))))
}

impl<O: ToPoint2> Envelops<O> for Tri2 {
    fn envelops(&self, p: O) -> bool {
        point_in_triangle(p, *self)
    }
}
