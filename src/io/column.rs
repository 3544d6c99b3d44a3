//! Delimited text tables.
//!
//! Survey exports are tab separated with a header line. Lines that cannot be parsed are skipped
//! with a warning, the way the survey tools treat stray lines.
use super::*;

/// One value per line.
pub fn to_column(values: &[f64]) -> String {
    values.iter().map(|v| format!("{}\n", v)).collect()
}

/// Read column `column` of a tab separated table, skipping lines that are not numbers.
pub fn read_column(text: &str, column: usize) -> Vec<f64> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .filter_map(|(i, l)| {
            let v = l.split('\t').nth(column).and_then(|f| f.trim().parse().ok());
            if v.is_none() {
                log::debug!("line {}: no number in column {}", i + 1, column);
            }
            v
        })
        .collect()
}

/// Read EMI samples, columns `id, x, y, value` after a header line.
///
/// A non-integer id is dropped, the sample is kept.
pub fn read_samples(text: &str) -> Vec<Sample> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, l)| !l.trim().is_empty())
        .filter_map(|(i, l)| {
            let fs = l.split('\t').map(str::trim).collect::<Vec<_>>();
            let num = |j: usize| fs.get(j).and_then(|f| f.parse::<f64>().ok());
            match (num(1), num(2), num(3)) {
                (Some(x), Some(y), Some(v)) => {
                    let s = Sample::new(x, y, v);
                    Some(match fs[0].parse() {
                        Ok(id) => s.with_id(id),
                        Err(_) => s,
                    })
                }
                _ => {
                    log::warn!("line {}: expecting x, y and value in columns 2 to 4", i + 1);
                    None
                }
            }
        })
        .collect()
}

/// Read ERT records from a tab separated table with named columns
/// `E1 N1 H1 E2 N2 H2 z1/m z2/m`, in any order.
pub fn read_ert(text: &str) -> Result<Vec<ErtRecord>> {
    const COLUMNS: [&str; 8] = ["E1", "N1", "H1", "E2", "N2", "H2", "z1/m", "z2/m"];

    let mut lines = text.lines().enumerate();
    let header = lines
        .next()
        .map(|(_, l)| l.split('\t').map(str::trim).collect::<Vec<_>>())
        .ok_or("expecting a header line")?;

    let mut idx = [0; 8];
    for (i, name) in COLUMNS.into_iter().enumerate() {
        idx[i] = header
            .iter()
            .position(|&h| h == name)
            .ok_or_else(|| format!("missing column '{}'", name))?;
    }

    let mut records = Vec::new();
    for (i, l) in lines.filter(|(_, l)| !l.trim().is_empty()) {
        let fs = l.split('\t').map(str::trim).collect::<Vec<_>>();
        let vs = idx.map(|j| fs.get(j).and_then(|f| f.parse::<f64>().ok()));
        match vs {
            [Some(e1), Some(n1), Some(h1), Some(e2), Some(n2), Some(h2), Some(z1), Some(z2)] => {
                records.push(ErtRecord {
                    e1: [e1, n1, h1],
                    e2: [e2, n2, h2],
                    z1,
                    z2,
                })
            }
            _ => log::warn!("line {}: incomplete ERT record, skipping", i + 1),
        }
    }

    Ok(records)
}

/// Read time steps of comma separated rows.
///
/// Steps are separated by an empty line. The first field of a row is a label and is ignored,
/// `NaN` fields are missing values.
pub fn read_steps(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut step = Step::new();

    for (i, l) in text.lines().enumerate() {
        let l = l.trim();
        if l.is_empty() {
            if !step.is_empty() {
                steps.push(std::mem::take(&mut step));
            }
            continue;
        }

        let row = l
            .split(',')
            .skip(1)
            .map(|f| match f.trim() {
                "NaN" | "nan" => Ok(None),
                f => f.parse::<f64>().map(Some),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| format!("line {}: {}", i + 1, e))?;
        step.push(row);
    }

    if !step.is_empty() {
        steps.push(step);
    }

    Ok(steps)
}
