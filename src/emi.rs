use crate::*;
use std::fmt;

/// Dipole orientation of an EMI measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Dipole {
    H,
    V,
}

impl Dipole {
    pub const ALL: [Dipole; 2] = [Dipole::H, Dipole::V];

    /// The cell array the dipole's values are attached as.
    pub fn array_name(self) -> &'static str {
        match self {
            Dipole::H => "TM_DD_H",
            Dipole::V => "TM_DD_V",
        }
    }

    fn idx(self) -> usize {
        self as usize
    }
}

/// Survey region, each dipole is measured over regions A, B and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Region {
    A,
    B,
    C,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::A, Region::B, Region::C];

    fn idx(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dipole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The source file holding one region of one dipole, `{base}_{region}_{dipole}.txt`.
pub fn file_name(base: &str, region: Region, dipole: Dipole) -> String {
    format!("{}_{}_{}.txt", base, region, dipole)
}

/// The measurement output of one dipole, `{base}_{dipole}.txt`.
pub fn output_name(base: &str, dipole: Dipole) -> String {
    format!("{}_{}.txt", base, dipole)
}

/// EMI samples, kept per dipole and region in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmiSurvey {
    samples: [[Vec<Sample>; 3]; 2],
}

/// Samples mapped onto a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Draped {
    pub geometry: Geometry,
    /// Samples outside the surface, these keep their own elevation.
    pub unmapped: usize,
}

impl EmiSurvey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<I>(&mut self, dipole: Dipole, region: Region, samples: I)
    where
        I: IntoIterator<Item = Sample>,
    {
        self.samples[dipole.idx()][region.idx()].extend(samples);
    }

    pub fn region(&self, dipole: Dipole, region: Region) -> &[Sample] {
        &self.samples[dipole.idx()][region.idx()]
    }

    /// All samples of a dipole, regions A, B then C.
    pub fn samples(&self, dipole: Dipole) -> Vec<Sample> {
        self.samples[dipole.idx()].concat()
    }

    /// The measured values of a dipole, in [`EmiSurvey::samples`] order.
    pub fn measurements(&self, dipole: Dipole) -> Vec<f64> {
        self.samples[dipole.idx()]
            .iter()
            .flatten()
            .map(|s| s.value)
            .collect()
    }

    /// The sample positions of a dipole as a point geometry named `EMI Data {dipole}`.
    pub fn geometry(&self, dipole: Dipole) -> Geometry {
        let points = self.samples[dipole.idx()]
            .iter()
            .flatten()
            .map(|s| s.position)
            .collect();
        Geometry::from_points(format!("EMI Data {}", dipole), points)
    }

    /// Bin both dipoles into the cells of `mesh`, attaching them as `TM_DD_H` and `TM_DD_V`.
    ///
    /// Returns the number of dropped samples per dipole. The mesh is left untouched on error.
    pub fn attach_to_mesh(&self, mesh: &mut Mesh) -> Result<[usize; 2]> {
        for d in Dipole::ALL {
            if self.samples[d.idx()].iter().all(Vec::is_empty) {
                return Err(Error::EmptyInput("EMI dipole samples"));
            }
            if mesh.cell_array(d.array_name()).is_some() {
                return Err(Error::ArrayExists(d.array_name().to_string()));
            }
        }

        let locator = BinningOptions::default().locator(mesh)?;
        let binned = Dipole::ALL.map(|d| {
            let b = locator.bin(&self.samples(d));
            log::info!(
                "dipole {}: {} samples binned, {} outside the mesh",
                d,
                b.binned(),
                b.dropped
            );
            b
        });

        for (d, b) in Dipole::ALL.into_iter().zip(&binned) {
            b.attach(mesh, d.array_name())?;
        }

        Ok(binned.map(|b| b.dropped))
    }

    /// Map the samples of a dipole onto `surface`.
    ///
    /// The elevation of a sample is taken from the plane of the surface triangle beneath it.
    pub fn drape(&self, surface: &Mesh, dipole: Dipole) -> Result<Draped> {
        let locator = CellLocator::plan(surface)?;
        let mut geometry = self.geometry(dipole);

        let mut unmapped = 0;
        for p in geometry.points_mut() {
            match surface_z(surface, &locator, *p) {
                Some(z) => p[2] = z,
                None => unmapped += 1,
            }
        }

        if unmapped > 0 {
            log::warn!(
                "{} samples of dipole {} are not on the surface",
                unmapped,
                dipole
            );
        }

        Ok(Draped { geometry, unmapped })
    }
}

fn surface_z(surface: &Mesh, locator: &CellLocator, p: Point3) -> Option<f64> {
    let cell = locator.locate(p)?;
    let p2 = p.to_p2();
    surface
        .cell_tris(cell)
        .find(|t| point_in_triangle(p2, t.map(ToPoint2::to_p2)))
        .and_then(Plane::from_tri)
        .and_then(|plane| plane.register_z(p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> EmiSurvey {
        let mut s = EmiSurvey::new();
        s.add(Dipole::H, Region::B, [Sample::new(1.5, 0.5, 3.0)]);
        s.add(Dipole::H, Region::A, [Sample::new(0.5, 0.5, 1.0)]);
        s.add(Dipole::H, Region::C, [Sample::new(0.6, 0.4, 5.0)]);
        s.add(
            Dipole::V,
            Region::A,
            [Sample::new(1.5, 1.5, 8.0), Sample::new(9.0, 9.0, 0.0)],
        );
        s
    }

    #[test]
    fn naming() {
        assert_eq!(file_name("emi", Region::B, Dipole::V), "emi_B_V.txt");
        assert_eq!(output_name("out", Dipole::H), "out_H.txt");
        assert_eq!(Dipole::V.array_name(), "TM_DD_V");
        assert_eq!(survey().geometry(Dipole::V).name, "EMI Data V");
    }

    #[test]
    fn regions_are_concatenated() {
        let s = survey();
        assert_eq!(s.measurements(Dipole::H), vec![1.0, 3.0, 5.0]);
        assert_eq!(s.samples(Dipole::V).len(), 2);
        assert_eq!(s.region(Dipole::H, Region::C).len(), 1);
    }

    #[test]
    fn attaching_dipoles() {
        let mut mesh = dummy_mesh();
        let dropped = survey().attach_to_mesh(&mut mesh).unwrap();
        assert_eq!(dropped, [0, 1]);
        assert_eq!(
            mesh.cell_floats("TM_DD_H"),
            Some(&[3.0, 3.0, 0.0, 0.0][..])
        );
        assert_eq!(
            mesh.cell_floats("TM_DD_V"),
            Some(&[0.0, 0.0, 0.0, 8.0][..])
        );

        // already attached
        assert!(survey().attach_to_mesh(&mut mesh).is_err());
    }

    #[test]
    fn missing_dipole() {
        let mut s = EmiSurvey::new();
        s.add(Dipole::H, Region::A, [Sample::new(0.5, 0.5, 1.0)]);
        let mut mesh = dummy_mesh();
        assert_eq!(
            s.attach_to_mesh(&mut mesh).unwrap_err(),
            Error::EmptyInput("EMI dipole samples")
        );
        assert!(mesh.cell_array_names().is_empty());
    }

    #[test]
    fn draping_onto_a_slope() {
        // z = x + 2y
        let nodes = (0..3)
            .flat_map(|y| (0..3).map(move |x| [x as f64, y as f64, x as f64 + 2.0 * y as f64]))
            .collect();
        let cells = [0, 1, 3, 4]
            .into_iter()
            .map(|i| Cell::Quad([i, i + 1, i + 4, i + 3]))
            .collect();
        let surface = Mesh::new(nodes, cells).unwrap();

        let d = survey().drape(&surface, Dipole::V).unwrap();
        assert_eq!(d.unmapped, 1);
        let [x, y, z] = d.geometry.points()[0];
        assert_eq!([x, y], [1.5, 1.5]);
        assert!((z - 4.5).abs() < 1e-11);
        assert_eq!(d.geometry.points()[1], [9.0, 9.0, 0.0]);
    }
}
