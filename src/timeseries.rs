use crate::*;

/// One time step: rows of cell values, `None` for a missing value.
pub type Step = Vec<Vec<Option<f64>>>;

/// A named scalar cell array over a series of time steps.
///
/// The target mesh is organised in rows by its material ids: with material ids up to `m`, the
/// mesh has `m + 1` rows of `cell_len / (m + 1)` cells, row `i` being the cells
/// `i * n_cols..(i + 1) * n_cols`. Meshes from [`section_mesh`] follow this layout.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSeries {
    name: String,
    steps: Vec<Step>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// A copy of `mesh` with the values of time step `step` attached.
    ///
    /// Missing values become `0.0`.
    ///
    /// # Panics
    /// Panics if `step` is out of bounds.
    pub fn apply(&self, mesh: &Mesh, step: usize) -> Result<Mesh> {
        let (n_rows, n_cols) = row_layout(mesh)?;
        let rows = &self.steps[step];
        if rows.len() != n_rows {
            return Err(Error::ArrayLength {
                name: self.name.clone(),
                expected: n_rows,
                found: rows.len(),
            });
        }

        let mut values = vec![0.0; mesh.cell_len()];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(Error::ArrayLength {
                    name: self.name.clone(),
                    expected: n_cols,
                    found: row.len(),
                });
            }

            let dst = &mut values[i * n_cols..(i + 1) * n_cols];
            for (d, v) in dst.iter_mut().zip(row) {
                *d = v.unwrap_or(0.0);
            }
        }

        let mut mesh = mesh.clone();
        mesh.add_cell_array(self.name.clone(), CellArray::Float(values))?;
        Ok(mesh)
    }

    /// One mesh per time step, see [`TimeSeries::apply`].
    pub fn apply_all(&self, mesh: &Mesh) -> Result<Vec<Mesh>> {
        (0..self.len())
            .map(|i| {
                let m = self.apply(mesh, i)?;
                log::info!("time step {} of '{}' attached", i, self.name);
                Ok(m)
            })
            .collect()
    }
}

/// The number of rows and cells per row, derived from the material ids.
pub fn row_layout(mesh: &Mesh) -> Result<(usize, usize)> {
    let max = mesh
        .material_ids()
        .and_then(|ids| ids.iter().copied().max())
        .filter(|&m| m >= 0)
        .ok_or_else(|| Error::MissingArray(MATERIAL_IDS.to_string()))?;

    let n_rows = max as usize + 1;
    Ok((n_rows, mesh.cell_len() / n_rows))
}

/// The name of time step `n` in a series called `base`.
pub fn step_name(base: &str, n: usize) -> String {
    format!("{}{}", base, n)
}
