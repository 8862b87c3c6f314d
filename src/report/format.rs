//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the search/fitting code stays clean and testable
//! - output changes are localized

use crate::data::LightCurveDiagnostics;
use crate::domain::{DetectConfig, DetectionResult, Verdict};
use crate::report::PointResidual;

/// Format the run summary (data, search, fit, decision).
pub fn format_detection_summary(source: &str, result: &DetectionResult, config: &DetectConfig) -> String {
    let mut out = String::new();

    out.push_str("=== transit - BLS transit search ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Points: n={} (after cleaning)\n", result.n_points));
    out.push_str(&format!(
        "Grid: P=[{:.3}, {:.3}]d x {} | durations {} | phases {}\n",
        config.min_period, config.max_period, config.period_steps, config.duration_steps, config.phase_steps
    ));
    if result.periods_evaluated < result.periods_total {
        out.push_str(&format!(
            "  (time budget: scanned {}/{} periods)\n",
            result.periods_evaluated, result.periods_total
        ));
    }

    let c = &result.candidate;
    out.push_str("\nBest BLS candidate:\n");
    out.push_str(&format!(
        "- power={:.2} (threshold {:.2})\n",
        c.power, config.detection_threshold
    ));
    out.push_str(&format!(
        "- period={:.4}d t0={:.4}d duration={:.4}d\n",
        c.period, c.t0, c.duration
    ));

    if let Some(fit) = result.verdict.fit() {
        out.push_str("\nTransit fit:\n");
        out.push_str(&format!(
            "- depth={:.1}ppm period={:.4}d t0={:.4}d duration={:.2}h\n",
            fit.depth * 1e6,
            fit.period,
            fit.t0,
            fit.duration * 24.0
        ));
        out.push_str(&format!(
            "- chi2={:.4e} reduced={:.4e} evaluations={}\n",
            fit.chi2, fit.reduced_chi2, fit.evaluations
        ));
    }
    if let Some(sig) = result.verdict.significance() {
        out.push_str(&format!(
            "- snr={:.2} fap={:.6} confidence={:.1}%\n",
            sig.snr, sig.false_alarm_probability, sig.confidence_percent
        ));
    }

    out.push_str(&format!("\nVerdict: {}\n", result.verdict.label()));
    match &result.verdict {
        Verdict::FitFailed { reason } => out.push_str(&format!("- reason: {reason}\n")),
        Verdict::Accepted { properties, .. } => {
            out.push_str(&format!(
                "- radius={:.2} R_earth a={:.4} AU T_eq={:.1} K v={:.2} km/s\n",
                properties.radius_earth,
                properties.semi_major_axis_au,
                properties.equilibrium_temp_k,
                properties.orbital_velocity_kms
            ));
        }
        _ => {}
    }

    out
}

/// Table of the in-transit points (model below 1), deepest first.
pub fn format_transit_points(residuals: &[PointResidual], top_n: usize) -> String {
    let mut rows: Vec<&PointResidual> = residuals.iter().filter(|r| r.model < 1.0).collect();
    rows.sort_by(|a, b| a.flux.total_cmp(&b.flux));

    let mut out = String::new();
    out.push_str("In-transit points (deepest first):\n");
    out.push_str(
        format!(
            "{:>12} {:>9} {:>10} {:>10} {:>10}\n",
            "time", "phase", "flux", "model", "residual"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<9} {:-<10} {:-<10} {:-<10}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows.iter().take(top_n) {
        out.push_str(
            format!(
                "{:>12.5} {:>9.5} {:>10.6} {:>10.6} {:>10.6}\n",
                r.time, r.phase, r.flux, r.model, r.residual
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if rows.is_empty() {
        out.push_str("(none)\n");
    }

    out
}

/// Format the `inspect` report.
pub fn format_diagnostics(source: &str, d: &LightCurveDiagnostics) -> String {
    let mut out = String::new();

    out.push_str("=== transit - light curve diagnostics ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Points: n={} | span={:.2}d\n", d.n_points, d.time_span));

    out.push_str("\nFlux statistics:\n");
    out.push_str(&format!("- mean={:.6} median={:.6}\n", d.mean, d.median));
    out.push_str(&format!("- std={:.6} mad={:.6} cv={:.6}\n", d.std, d.mad, d.coefficient_of_variation));

    out.push_str("\nNaive transit check:\n");
    out.push_str(&format!(
        "- depth={:.6} ({:.4}%) snr={:.2}\n",
        d.naive_depth,
        d.naive_depth * 100.0,
        d.naive_snr
    ));

    out.push_str("\nInstrumental check:\n");
    out.push_str(&format!(
        "- max jump={:.6} mean change={:.6} ratio={:.2}\n",
        d.max_jump, d.mean_abs_change, d.jump_ratio
    ));
    out.push_str(&format!(
        "- linear trend slope={:.8} r2={:.6}\n",
        d.trend_slope, d.trend_r_squared
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlsCandidate;

    fn no_signal() -> DetectionResult {
        DetectionResult {
            n_points: 180,
            candidate: BlsCandidate {
                period: 4.25,
                power: 3.5,
                t0: 0.8,
                duration: 0.2,
            },
            periods_evaluated: 400,
            periods_total: 1000,
            verdict: Verdict::RejectedNoSignal,
        }
    }

    #[test]
    fn summary_mentions_verdict_and_budget() {
        let s = format_detection_summary("stdin", &no_signal(), &DetectConfig::default());
        assert!(s.contains("Source: stdin"));
        assert!(s.contains("power=3.50"));
        assert!(s.contains("scanned 400/1000"));
        assert!(s.contains("Verdict: rejected: no signal"));
        assert!(!s.contains("Transit fit:"));
    }

    #[test]
    fn transit_table_sorts_deepest_first() {
        let point = |time: f64, flux: f64, model: f64| PointResidual {
            time,
            flux,
            phase: 0.0,
            model,
            residual: flux - model,
        };
        let rows = vec![
            point(1.0, 0.991, 0.99),
            point(2.0, 1.0, 1.0),
            point(4.0, 0.987, 0.99),
        ];
        let table = format_transit_points(&rows, 10);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("0.987000"));
        assert!(lines[4].contains("0.991000"));

        assert!(format_transit_points(&rows[1..2], 10).contains("(none)"));
    }
}
