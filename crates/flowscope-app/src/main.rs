//! FlowScope - dense optical flow from the command line.
//!
//! Reads five temporally ordered grayscale PGM frames, computes the
//! per-pixel velocity field, and optionally writes it as a .flo file
//! and/or scores it against a ground-truth reference.

use anyhow::{bail, Context, Result};
use flowscope_core::FrameGroup;
use flowscope_flow::{compute_flow, PipelineOptions};
use flowscope_io::{average_angular_error, average_endpoint_error, read_flo, read_pgm, write_flo};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "\
Usage: flowscope <frame1.pgm> <frame2.pgm> <frame3.pgm> <frame4.pgm> <frame5.pgm> [options]

Options:
  -o, --output <out.flo>      write the computed flow field
      --reference <gt.flo>    score against a ground-truth flow field
      --threaded              run pipeline stages on separate threads
      --report <run.json>     write a JSON run report
  -v, --verbose               debug logging
  -h, --help                  show this message";

#[derive(Debug, Default)]
struct Args {
    frames: Vec<PathBuf>,
    output: Option<PathBuf>,
    reference: Option<PathBuf>,
    report: Option<PathBuf>,
    threaded: bool,
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    width: u32,
    height: u32,
    threaded: bool,
    elapsed_ms: f64,
    output: Option<PathBuf>,
    angular_error_deg: Option<f64>,
    endpoint_error_px: Option<f64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                args.output = Some(next_value(&mut iter, &arg)?);
            }
            "--reference" => {
                args.reference = Some(next_value(&mut iter, &arg)?);
            }
            "--report" => {
                args.report = Some(next_value(&mut iter, &arg)?);
            }
            "--threaded" => args.threaded = true,
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option {other}\n{USAGE}"),
            _ => args.frames.push(PathBuf::from(arg)),
        }
    }
    if args.frames.len() != 5 {
        bail!(
            "expected 5 frame paths, got {}\n{USAGE}",
            args.frames.len()
        );
    }
    Ok(args)
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
    iter.next()
        .map(PathBuf::from)
        .with_context(|| format!("{flag} requires a value"))
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let frames = args
        .frames
        .iter()
        .map(|path| read_pgm(path).with_context(|| format!("reading {}", path.display())))
        .collect::<Result<Vec<_>>>()?;
    let group = FrameGroup::new(frames)?;
    info!(
        width = group.width(),
        height = group.height(),
        "loaded frame group"
    );

    let options = PipelineOptions {
        threaded: args.threaded,
        ..Default::default()
    };
    let start = Instant::now();
    let field = compute_flow(&group, &options)?;
    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "computed flow field");
    println!("elapsed time: {} us", elapsed.as_micros());

    if let Some(path) = &args.output {
        write_flo(path, &field).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote flow field");
    }

    let mut angular = None;
    let mut endpoint = None;
    if let Some(path) = &args.reference {
        let reference = read_flo(path).with_context(|| format!("reading {}", path.display()))?;
        let aae = average_angular_error(&field, &reference)?;
        let epe = average_endpoint_error(&field, &reference)?;
        println!("average angular error: {aae:.6} degrees");
        println!("average endpoint error: {epe:.6} px");
        angular = Some(aae);
        endpoint = Some(epe);
    }

    if let Some(path) = &args.report {
        let report = RunReport {
            width: group.width(),
            height: group.height(),
            threaded: args.threaded,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            output: args.output.clone(),
            angular_error_deg: angular,
            endpoint_error_px: endpoint,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
