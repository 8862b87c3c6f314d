//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the detection pipeline
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io::{BufWriter, Write};

use clap::Parser;
use log::info;

use crate::cli::{Command, DetectArgs, InspectArgs, OutputFormat, PlotArgs, SimulateArgs};
use crate::data::{SyntheticConfig, diagnose, generate_light_curve};
use crate::domain::{DetectConfig, DetectionReport, MIN_RAW_ROWS};
use crate::error::{AppError, DetectError};
use crate::io::{ResultFile, load_light_curve, read_result_json, write_light_curve, write_residuals_csv, write_result_json};

pub mod pipeline;

/// Entry point for the `transit` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();

    // `transit` and `transit --min-period 1` behave like `transit detect ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Detect(args) => handle_detect(args),
        Command::Inspect(args) => handle_inspect(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_detect(args: DetectArgs) -> Result<(), AppError> {
    let config = detect_config_from_args(&args);
    let source = pipeline::source_label(args.input.as_deref());

    let run = match pipeline::run_detect(args.input.as_deref(), &config) {
        Ok(run) => run,
        Err(err) => {
            let report = DetectionReport::from(err.clone());
            if args.format == OutputFormat::Json {
                print_json(&report, args.pretty)?;
            }
            if let Some(path) = &args.export_result {
                write_result_json(path, &ResultFile::new(&source, &config, report, None, None))?;
            }
            return Err(err.into());
        }
    };
    let report = run.report();

    match args.format {
        OutputFormat::Json => print_json(&report, args.pretty)?,
        OutputFormat::Text => {
            println!(
                "{}",
                crate::report::format::format_detection_summary(&run.source, &run.result, &config)
            );
            if let Some(residuals) = &run.residuals {
                println!("{}", crate::report::format::format_transit_points(residuals, args.top));
            }
            if args.plot {
                match (run.result.verdict.fit(), &run.residuals) {
                    (Some(fit), Some(residuals)) => {
                        let plot = crate::plot::render_folded_plot(residuals, fit, args.width, args.height);
                        println!("{plot}");
                    }
                    _ => println!("(no fitted transit to plot)"),
                }
            }
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        match &run.residuals {
            Some(residuals) => write_residuals_csv(path, residuals)?,
            None => info!("no fitted transit; skipping per-point export"),
        }
    }
    if let Some(path) = &args.export_result {
        let file = ResultFile::new(
            &run.source,
            &config,
            report,
            run.result.verdict.fit(),
            Some(&run.series),
        );
        write_result_json(path, &file)?;
    }

    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let source = pipeline::source_label(args.input.as_deref());
    let ingest = load_light_curve(args.input.as_deref(), 0)?;
    let diagnostics = diagnose(&ingest.time, &ingest.flux)?;

    if args.json {
        print_json(&diagnostics, true)?;
    } else {
        println!("{}", crate::report::format::format_diagnostics(&source, &diagnostics));
        if ingest.time.len() < MIN_RAW_ROWS {
            println!("Note: detection needs at least {MIN_RAW_ROWS} rows.");
        }
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulate_config_from_args(&args);
    let curve = generate_light_curve(&config)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
            let mut out = BufWriter::new(file);
            write_light_curve(&mut out, &curve.time, &curve.flux)?;
            out.flush()
                .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
            info!("wrote {} points to {}", curve.time.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_light_curve(&mut out, &curve.time, &curve.flux)?;
        }
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = read_result_json(&args.result)?;
    let plot = crate::plot::render_folded_plot_from_result(&file, args.width, args.height).ok_or_else(|| {
        AppError::new(
            2,
            format!("Result file '{}' holds no fitted transit to plot.", args.result.display()),
        )
    })?;

    println!("{plot}");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| AppError::from(DetectError::numerical(format!("Failed to serialize JSON: {e}"))))?;
    println!("{text}");
    Ok(())
}

pub fn detect_config_from_args(args: &DetectArgs) -> DetectConfig {
    DetectConfig {
        min_period: args.min_period,
        max_period: args.max_period,
        period_steps: args.period_steps,
        duration_steps: args.duration_steps,
        phase_steps: args.phase_steps,
        min_transit_duration: args.min_duration,
        detection_threshold: args.detection_threshold,
        stellar_radius: args.stellar_radius,
        clip_mode: args.clip,
        max_fit_iterations: args.max_fit_iterations,
        time_budget_secs: args.time_budget,
        ..DetectConfig::default()
    }
}

pub fn simulate_config_from_args(args: &SimulateArgs) -> SyntheticConfig {
    SyntheticConfig {
        n_points: args.points,
        baseline_days: args.baseline,
        period: args.period,
        depth: args.depth,
        duration: args.duration,
        t0: args.t0,
        noise_sigma: args.noise,
        drift_per_day: args.drift,
        seed: args.seed,
    }
}

/// Rewrite argv so `transit` defaults to `transit detect`.
///
/// Rules:
/// - `transit`                          -> `transit detect`
/// - `transit --min-period 1 ...`       -> `transit detect --min-period 1 ...`
/// - `transit --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("detect".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "detect" | "inspect" | "simulate" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "detect flags".
    if arg1.starts_with('-') {
        argv.insert(1, "detect".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
