use super::*;
use std::fmt::Write;

/// The no-data marker written by [`to_asc`].
pub const NODATA: f64 = -9999.0;

/// Read an ESRI ASCII grid.
///
/// The header holds `ncols`, `nrows`, the lower-left `xllcorner`/`yllcorner` (or the centre of
/// the lower-left pixel as `xllcenter`/`yllcenter`), `cellsize` and an optional
/// `NODATA_value`. Keys are case insensitive. Values follow row by row, the northern row first.
pub fn from_asc(asc: &[u8]) -> Result<Raster> {
    fn de(s: &str) -> std::result::Result<(Vec<(&str, f64)>, Vec<f64>), nom::Err<()>> {
        use nom::{
            bytes::complete::*, character::complete::*, combinator::*, multi::*,
            number::complete::*, sequence::*, IResult, Parser,
        };
        fn ws<'a, G, O>(g: G) -> impl FnMut(&'a str) -> IResult<&'a str, O, ()>
        where
            G: Parser<&'a str, O, ()>,
        {
            preceded(multispace0, g)
        }
        let key = take_while1(|c: char| c.is_ascii_alphabetic() || c == '_');

        let (s, header) = many1(ws(pair(key, ws(double))))(s)?;
        let (s, values) = many0(ws(double))(s)?;
        let _ = all_consuming(multispace0)(s)?;

        Ok((header, values))
    }

    let asc = std::str::from_utf8(asc).map_err(|_| "expecting file as utf8 string")?;
    let (header, values) = de(asc).map_err(|_| "malformed ASCII grid")?;

    let get = |k: &str| {
        header
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(k))
            .map(|&(_, v)| v)
    };
    let count = |k: &str| {
        get(k)
            .filter(|&v| v >= 1.0 && v.fract() == 0.0)
            .map(|v| v as usize)
            .ok_or_else(|| format!("missing or invalid '{}'", k))
    };

    let ncols = count("ncols")?;
    let nrows = count("nrows")?;
    let cellsize = get("cellsize").ok_or("missing 'cellsize'")?;

    let origin = match (get("xllcorner"), get("yllcorner")) {
        (Some(x), Some(y)) => [x, y],
        _ => match (get("xllcenter"), get("yllcenter")) {
            (Some(x), Some(y)) => [x, y].sub([cellsize * 0.5; 2]),
            _ => return Err("missing lower-left corner".into()),
        },
    };

    let len = ncols
        .checked_mul(nrows)
        .ok_or_else(|| format!("{}x{} grid is too large", ncols, nrows))?;
    if values.len() != len {
        return Err(format!(
            "expecting {} values for {}x{} grid, found {}",
            len,
            ncols,
            nrows,
            values.len()
        )
        .into());
    }

    let nodata = get("NODATA_value");
    let values = values
        .chunks(ncols)
        .rev()
        .flatten()
        .map(|&z| (Some(z) != nodata && z.is_finite()).then(|| z))
        .collect();

    Ok(Raster::from_values(origin, ncols, cellsize, values)?)
}

/// Write an ESRI ASCII grid, no-data as [`NODATA`].
pub fn to_asc(raster: &Raster) -> String {
    fn ser(raster: &Raster) -> std::result::Result<String, std::fmt::Error> {
        let mut s = String::new();
        let [x, y] = raster.origin();
        writeln!(s, "ncols {}", raster.x_count())?;
        writeln!(s, "nrows {}", raster.y_count())?;
        writeln!(s, "xllcorner {}", x)?;
        writeln!(s, "yllcorner {}", y)?;
        writeln!(s, "cellsize {}", raster.spacing())?;
        writeln!(s, "NODATA_value {}", NODATA)?;

        for y in (0..raster.y_count()).rev() {
            for x in 0..raster.x_count() {
                if x > 0 {
                    s.push(' ');
                }
                write!(s, "{}", raster.get(x, y).unwrap_or(NODATA))?;
            }
            s.push('\n');
        }

        Ok(s)
    }

    ser(raster).expect("writing to a string buffer should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEM: &str = "ncols 3
nrows 2
xllcorner 100.0
yllcorner 200.0
cellsize 10
NODATA_value -9999
1 2 -9999
4.5 5 6
";

    #[test]
    fn reading_asc() {
        let r = from_asc(DEM.as_bytes()).unwrap();
        assert_eq!(r.origin(), [100.0, 200.0]);
        assert_eq!(r.x_count(), 3);
        assert_eq!(r.y_count(), 2);
        assert_eq!(r.spacing(), 10.0);
        // bottom row first
        assert_eq!(r.get(0, 0), Some(4.5));
        assert_eq!(r.get(2, 1), None);
        assert_eq!(r.value_at([105.0, 215.0]), Some(1.0));
    }

    #[test]
    fn reading_centre_registered() {
        let s = "NCOLS 1\r\nNROWS 1\r\nXLLCENTER 5\r\nYLLCENTER 5\r\nCELLSIZE 10\r\n3\r\n";
        let r = from_asc(s.as_bytes()).unwrap();
        assert_eq!(r.origin(), [0.0, 0.0]);
        assert_eq!(r.get(0, 0), Some(3.0));
    }

    #[test]
    fn malformed_asc() {
        assert!(from_asc(b"ncols 3\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n").is_err());
        assert!(from_asc(b"ncols 1\nnrows 1\ncellsize 1\n1\n").is_err());
        assert!(from_asc(b"ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 x\n").is_err());
        assert!(from_asc(b"").is_err());
        assert!(from_asc(b"ncols 1e30\nnrows 1e30\nxllcorner 0\nyllcorner 0\ncellsize 1\n1\n").is_err());
    }

    #[test]
    fn writing_asc() {
        let r = from_asc(DEM.as_bytes()).unwrap();
        let s = to_asc(&r);
        assert!(s.starts_with("ncols 3\nnrows 2\nxllcorner 100\n"));
        assert!(s.ends_with("NODATA_value -9999\n1 2 -9999\n4.5 5 6\n"));
        assert_eq!(from_asc(s.as_bytes()).unwrap(), r);
    }
}
