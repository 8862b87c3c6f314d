//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The light curve is folded on the fitted ephemeris, so the x axis is the
//! centered phase `[-0.5, 0.5]` and the transit sits in the middle.
//!
//! Plot elements:
//! - observed points: `o`
//! - observed points inside the fitted transit window: `T`
//! - fitted box model: `-` line

use crate::domain::TransitFit;
use crate::io::ResultFile;
use crate::report::PointResidual;

const PHASE_MIN: f64 = -0.5;
const PHASE_MAX: f64 = 0.5;

/// Render a folded plot for an in-memory fit.
pub fn render_folded_plot(residuals: &[PointResidual], fit: &TransitFit, width: usize, height: usize) -> String {
    let curve = sample_box(fit.depth, fit.period, fit.duration, width.max(2));
    let points: Vec<(f64, f64, char)> = residuals
        .iter()
        .map(|r| (r.phase, r.flux, if r.model < 1.0 { 'T' } else { 'o' }))
        .collect();
    render_plot(&points, Some(&curve), width, height)
}

/// Render a folded plot from a saved result file.
///
/// Returns `None` when the file holds no fitted model.
pub fn render_folded_plot_from_result(file: &ResultFile, width: usize, height: usize) -> Option<String> {
    let grid = file.model_grid.as_ref()?;
    let curve: Vec<(f64, f64)> = grid.phase.iter().zip(&grid.flux).map(|(&p, &f)| (p, f)).collect();

    let points: Vec<(f64, f64, char)> = file
        .observed
        .as_ref()
        .map(|obs| {
            obs.phase
                .iter()
                .zip(&obs.flux)
                .map(|(&p, &f)| {
                    let inside = (p * grid.period).abs() < grid.duration / 2.0;
                    (p, f, if inside { 'T' } else { 'o' })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(render_plot(&points, Some(&curve), width, height))
}

fn sample_box(depth: f64, period: f64, duration: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let phase = PHASE_MIN + u * (PHASE_MAX - PHASE_MIN);
        let flux = if (phase * period).abs() < duration / 2.0 { 1.0 - depth } else { 1.0 };
        out.push((phase, flux));
    }
    out
}

fn render_plot(points: &[(f64, f64, char)], curve_points: Option<&[(f64, f64)]>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points, curve_points).unwrap_or((0.99, 1.01));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the model first so points can overlay.
    if let Some(curve) = curve_points {
        draw_curve(&mut grid, curve, y_min, y_max);
    }

    for &(phase, flux, ch) in points {
        let x = map_x(phase, PHASE_MIN, PHASE_MAX, width);
        let y = map_y(flux, y_min, y_max, height);
        grid[y][x] = ch;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: phase=[{PHASE_MIN:.3}, {PHASE_MAX:.3}] | flux=[{y_min:.5}, {y_max:.5}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(f64, f64, char)], curve: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y, _) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if let Some(curve) = curve {
        for &(_, y) in curve {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(phase, y) in curve {
        let x = map_x(phase, PHASE_MIN, PHASE_MAX, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
