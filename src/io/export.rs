//! CSV exports.
//!
//! - per-point results of a detection run (easy to load in spreadsheets/scripts)
//! - raw `time,flux` light curves written by `simulate`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AppError;
use crate::report::PointResidual;

/// Write per-point residuals to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_residuals(&mut out, residuals)?;
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

pub fn write_residuals<W: Write>(out: &mut W, residuals: &[PointResidual]) -> Result<(), AppError> {
    writeln!(out, "time,flux,phase,model,residual")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            out,
            "{:.10},{:.10},{:.8},{:.10},{:.10}",
            r.time, r.flux, r.phase, r.model, r.residual
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

/// Write a `time,flux` light curve that `ingest` can read back.
pub fn write_light_curve<W: Write>(out: &mut W, time: &[f64], flux: &[f64]) -> Result<(), AppError> {
    writeln!(out, "time,flux").map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for (t, f) in time.iter().zip(flux) {
        writeln!(out, "{t:.10},{f:.10}").map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_light_curve;

    #[test]
    fn residual_rows_have_five_columns() {
        let rows = vec![PointResidual {
            time: 1.0,
            flux: 0.991,
            phase: 0.0,
            model: 0.99,
            residual: 0.001,
        }];
        let mut buf = Vec::new();
        write_residuals(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,flux,phase,model,residual");
        assert_eq!(lines[1].split(',').count(), 5);
        assert!(lines[1].starts_with("1.0000000000,0.9910000000"));
    }

    #[test]
    fn light_curve_reads_back_through_ingest() {
        let time: Vec<f64> = (0..120).map(|i| i as f64 * 0.25).collect();
        let flux: Vec<f64> = time.iter().map(|t| 1.0 + 1e-4 * t).collect();
        let mut buf = Vec::new();
        write_light_curve(&mut buf, &time, &flux).unwrap();

        let curve = parse_light_curve(buf.as_slice(), 100).unwrap();
        assert_eq!(curve.time, time);
        assert!(curve.flux.iter().zip(&flux).all(|(a, b)| (a - b).abs() < 1e-9));
    }
}
