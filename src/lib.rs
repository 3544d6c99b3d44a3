//! Geometric kernels for converting geoscience survey data into meshes and geometries.
//!
//! The centre piece is [`bin`]: scattered measurements are assigned to the cells of a flattened
//! mesh and averaged per cell. Around it sit the constructions used by the survey converters:
//! ERT profile meshes ([`ert_mesh`]), layered sections ([`section_mesh`]), EMI sample sets
//! ([`EmiSurvey`]), building extrusion ([`extrude`]) and DEM rasters ([`Raster`]).
use rustc_hash::FxHashMap as HashMap;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod binning;
mod buildings;
mod emi;
mod ert;
mod error;
mod extents;
mod geometry;
#[cfg(feature = "io")]
pub mod io;
mod locate;
mod mesh;
mod plane;
mod point;
pub mod polygon;
mod raster;
mod section;
mod spatial;
mod timeseries;

pub use binning::*;
pub use buildings::*;
pub use emi::*;
pub use ert::*;
pub use error::*;
pub use extents::*;
pub use geometry::*;
pub use locate::*;
pub use mesh::*;
pub use plane::*;
pub use point::*;
pub use polygon::{fan, point_in_polygon, point_in_triangle, Tri2};
pub use raster::*;
pub use section::*;
pub use spatial::*;
pub use timeseries::*;

pub trait Envelops<O> {
    fn envelops(&self, object: O) -> bool;
}

/// 2x2 unit squares, cell ids row first:
///
/// ```text
/// 6---7---8
/// | 2 | 3 |
/// 3---4---5
/// | 0 | 1 |
/// 0---1---2
/// ```
#[cfg(test)]
fn dummy_mesh() -> Mesh {
    let nodes = (0..3)
        .flat_map(|y| (0..3).map(move |x| [x as f64, y as f64, 0.0]))
        .collect();
    let cells = [0, 1, 3, 4]
        .into_iter()
        .map(|i| Cell::Quad([i, i + 1, i + 4, i + 3]))
        .collect();
    Mesh::new(nodes, cells).unwrap()
}

#[cfg(test)]
type P2 = (f64, f64);

/// Arbitrary floats are brought into a sensible range, non-finite ones are discarded.
#[cfg(test)]
fn finite_p2((x, y): P2) -> Option<Point2> {
    [x, y]
        .is_finite()
        .then(|| [x % 1e4, y % 1e4])
}
