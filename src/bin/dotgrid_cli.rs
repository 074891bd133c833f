//! CLI tool for dotgrid - renders a grid off-screen and outputs JSON
//!
//! Usage:
//!   dotgrid_cli <total> <passed> [options]
//!
//! Options:
//!   --width <px>            container width (default 400)
//!   --viewport <w>x<h>      viewport size (default: container width x 800)
//!   --dpr <ratio>           device pixel ratio (default 1)
//!   --cell-size <px>        dot size
//!   --gap <px>              gap between dots
//!   --focus <index>         zoom onto a cell and let the camera settle
//!   --day-fraction <0..1>   fraction of today elapsed (default: now)
//!   --theme <json>          theme colors, e.g. '{"today":"#22c55e"}'
//!   -o <file>               write JSON to a file instead of stdout
//!
//! Set `RUST_LOG=dotgrid=trace` to see per-frame logging on stderr.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dotgrid::camera::{Transform, NOMINAL_FRAME_MS};
use dotgrid::clock::day_fraction_now;
use dotgrid::render::{FrameStats, SurfaceOp, SurfaceSize, Theme};
use dotgrid::{FrameEnv, GridLayout, GridOptions, GridState, RecordingSurface};

/// Upper bound on simulated frames while waiting for the camera.
const MAX_SETTLE_TICKS: u32 = 10_000;

const USAGE: &str = "Usage: dotgrid_cli <total> <passed> [--width px] [--viewport WxH] \
                     [--dpr r] [--cell-size px] [--gap px] [--focus i] [--day-fraction f] \
                     [--theme json] [-o output.json]";

struct CliArgs {
    options: GridOptions,
    container_width: f64,
    viewport: Option<(f64, f64)>,
    dpr: f64,
    day_fraction: Option<f64>,
    output: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameDump<'a> {
    version: &'static str,
    total_cells: u32,
    passed_cells: u32,
    focus: Option<u32>,
    day_fraction: f64,
    layout: GridLayout,
    rows: u32,
    surface: Option<SurfaceSize>,
    transform: Transform,
    ticks: u32,
    stats: Option<FrameStats>,
    theme: Theme,
    ops: &'a [SurfaceOp],
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse()
        .map_err(|_| format!("{flag}: cannot parse {raw:?}"))
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut options = GridOptions::new(0, 0);
    let mut container_width: f64 = 400.0;
    let mut viewport: Option<(f64, f64)> = None;
    let mut dpr: f64 = 1.0;
    let mut day_fraction: Option<f64> = None;
    let mut output: Option<String> = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--width" => container_width = parse_number(arg, iter.next())?,
            "--dpr" => dpr = parse_number(arg, iter.next())?,
            "--cell-size" => options.cell_size = Some(parse_number(arg, iter.next())?),
            "--gap" => options.gap = Some(parse_number(arg, iter.next())?),
            "--focus" => options.focus_index = Some(parse_number(arg, iter.next())?),
            "--day-fraction" => day_fraction = Some(parse_number(arg, iter.next())?),
            "--viewport" => {
                let raw = iter.next().ok_or("--viewport needs a value")?;
                let (w, h) = raw
                    .split_once('x')
                    .ok_or_else(|| format!("--viewport: expected WxH, got {raw:?}"))?;
                let w: f64 = w.parse().map_err(|_| format!("--viewport: bad width {w:?}"))?;
                let h: f64 = h.parse().map_err(|_| format!("--viewport: bad height {h:?}"))?;
                viewport = Some((w, h));
            }
            "--theme" => {
                let raw = iter.next().ok_or("--theme needs a value")?;
                options.theme =
                    serde_json::from_str(raw).map_err(|e| format!("--theme: {e}"))?;
            }
            "-o" => output = Some(iter.next().ok_or("-o needs a path")?.clone()),
            flag if flag.starts_with('-') && flag.parse::<i64>().is_err() => {
                return Err(format!("unknown option {flag}"));
            }
            _ => positional.push(arg),
        }
    }

    let [total, passed] = positional.as_slice() else {
        return Err("expected <total> <passed>".to_string());
    };
    options.total_cells = total
        .parse()
        .map_err(|_| format!("total: cannot parse {total:?}"))?;
    options.passed_cells = passed
        .parse()
        .map_err(|_| format!("passed: cannot parse {passed:?}"))?;

    Ok(CliArgs {
        options,
        container_width,
        viewport,
        dpr,
        day_fraction,
        output,
    })
}

/// Simulate frames at the nominal rate until the camera rests and describe
/// the last one.
fn render_json(cli: &CliArgs) -> dotgrid::Result<String> {
    let (viewport_width, viewport_height) =
        cli.viewport.unwrap_or((cli.container_width, 800.0));
    let mut state = GridState::new(&cli.options);
    state.resize(cli.container_width, viewport_width, viewport_height, cli.dpr);

    let theme = Theme::resolve(&cli.options.theme);
    let day_fraction = cli.day_fraction.unwrap_or_else(day_fraction_now);
    let mut surface = RecordingSurface::new();

    let mut ticks = 0;
    let mut now = 0.0;
    let outcome = loop {
        surface.clear_ops();
        let env = FrameEnv {
            now_ms: now,
            day_fraction,
            theme: &theme,
            color_override: None,
        };
        let outcome = state.tick(&mut surface, &env);
        ticks += 1;
        now += NOMINAL_FRAME_MS;
        if !state.camera().is_animating() || ticks >= MAX_SETTLE_TICKS {
            break outcome;
        }
    };
    tracing::debug!(ticks, "camera settled");

    let layout = state.layout();
    let dump = FrameDump {
        version: env!("CARGO_PKG_VERSION"),
        total_cells: state.total_cells(),
        passed_cells: state.passed_cells(),
        focus: state.focus(),
        day_fraction,
        layout,
        rows: layout.rows(state.total_cells()),
        surface: state.surface_size(),
        transform: state.camera().current(),
        ticks,
        stats: outcome.stats,
        theme,
        ops: surface.ops(),
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let json = match render_json(&cli) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{json}") {
                eprintln!("Error writing stdout: {e}");
                std::process::exit(1);
            }
        }
    }
}
