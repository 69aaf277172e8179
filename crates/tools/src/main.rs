use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use catalog::{CmsConfig, GraphqlRequest, ingest_response};
use clap::{Parser, Subcommand};
use foundation::{GeoPoint, GeoRect};
use serde::Serialize;
use tools::{FilterArgs, ViewArgs, run_query, run_resolve};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use venues::{SheetSnap, Venue};

#[derive(Parser, Debug)]
#[command(name = "venues", about = "Venue catalog diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the venue collection from the CMS (CMS_SPACE_ID, CMS_ACCESS_TOKEN,
    /// CMS_ENVIRONMENT) and write the raw response.
    Fetch {
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Filter and clip a response dump the way the map page does.
    Query {
        input: PathBuf,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        diet: Option<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "food")]
        food_categories: Vec<String>,
        #[arg(long = "price")]
        prices: Vec<String>,
        #[command(flatten)]
        view: ViewOpts,
    },
    /// Resolve a `restaurant` deep-link value against a response dump.
    Resolve {
        input: PathBuf,
        link: String,
        #[command(flatten)]
        view: ViewOpts,
    },
}

#[derive(clap::Args, Debug)]
struct ViewOpts {
    /// Camera center as `lat,lng`.
    #[arg(long, value_parser = parse_point)]
    center: Option<GeoPoint>,
    #[arg(long)]
    zoom: Option<f64>,
    /// Canvas size as `WIDTHxHEIGHT` in CSS pixels.
    #[arg(long, value_parser = parse_size)]
    size: Option<(f64, f64)>,
    /// Visible bounds as `west,south,east,north`.
    #[arg(long, value_parser = parse_rect)]
    bounds: Option<GeoRect>,
    /// List sheet snap: expanded, half or peek.
    #[arg(long, value_parser = parse_snap)]
    sheet: Option<SheetSnap>,
}

impl ViewOpts {
    fn is_empty(&self) -> bool {
        self.center.is_none()
            && self.zoom.is_none()
            && self.size.is_none()
            && self.bounds.is_none()
            && self.sheet.is_none()
    }

    fn to_args(&self) -> ViewArgs {
        let defaults = ViewArgs::default();
        let (width_px, height_px) = self.size.unwrap_or((defaults.width_px, defaults.height_px));
        ViewArgs {
            center: self.center.unwrap_or(defaults.center),
            zoom: self.zoom.unwrap_or(defaults.zoom),
            width_px,
            height_px,
            bounds: self.bounds,
            sheet: self.sheet.unwrap_or(defaults.sheet),
        }
    }
}

fn parse_floats<const N: usize>(s: &str, sep: char) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(sep).map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} values separated by '{sep}', got {s:?}"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid number {part:?}: {e}"))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let [lat, lng] = parse_floats::<2>(s, ',')?;
    let p = GeoPoint::new(lat, lng);
    if !p.is_valid() {
        return Err(format!("coordinate out of range: {s}"));
    }
    Ok(p)
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let [w, h] = parse_floats::<2>(s, 'x')?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("size must be positive: {s}"));
    }
    Ok((w, h))
}

fn parse_rect(s: &str) -> Result<GeoRect, String> {
    let [west, south, east, north] = parse_floats::<4>(s, ',')?;
    let r = GeoRect::new(west, south, east, north);
    if !r.is_valid() {
        return Err(format!("invalid bounds: {s}"));
    }
    Ok(r)
}

fn parse_snap(s: &str) -> Result<SheetSnap, String> {
    match s.to_ascii_lowercase().as_str() {
        "expanded" => Ok(SheetSnap::Expanded),
        "half" => Ok(SheetSnap::Half),
        "peek" => Ok(SheetSnap::Peek),
        other => Err(format!("unknown sheet snap: {other}")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Cli::parse().command {
        Command::Fetch { out } => cmd_fetch(out),
        Command::Query {
            input,
            query,
            diet,
            categories,
            food_categories,
            prices,
            view,
        } => {
            let filters = FilterArgs {
                query,
                diet,
                categories,
                food_categories,
                prices,
            };
            let out = run_query(load_dump(&input)?, &filters, &view.to_args());
            print_json(&out)
        }
        Command::Resolve { input, link, view } => {
            let args = view.to_args();
            let view = (!view.is_empty()).then_some(&args);
            let out = run_resolve(load_dump(&input)?, &link, view);
            print_json(&out)
        }
    }
}

#[tokio::main]
async fn cmd_fetch(out: Option<PathBuf>) -> Result<(), String> {
    let config = CmsConfig::from_env().map_err(|e| e.to_string())?;
    info!(endpoint = %config.endpoint(), "fetching venues");

    let resp = reqwest::Client::new()
        .post(config.endpoint())
        .header(reqwest::header::AUTHORIZATION, config.bearer())
        .json(&GraphqlRequest::venues(config.limit))
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| format!("read body: {e}"))?;
    if !status.is_success() {
        return Err(format!("CMS returned HTTP {status}"));
    }

    // Validate before writing so a broken dump is never saved.
    let report = ingest_response(&body).map_err(|e| e.to_string())?;
    if !report.dropped.is_empty() {
        warn!(count = report.dropped.len(), "records dropped during ingestion");
    }
    info!(
        venues = report.venues.len(),
        fingerprint = %report.fingerprint,
        "fetched venue batch"
    );

    match out {
        Some(path) => fs::write(&path, body).map_err(|e| format!("write {path:?}: {e}")),
        None => std::io::stdout()
            .write_all(body.as_bytes())
            .map_err(|e| format!("write stdout: {e}")),
    }
}

fn load_dump(path: &Path) -> Result<Vec<Venue>, String> {
    let body = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let report = ingest_response(&body).map_err(|e| format!("{path:?}: {e}"))?;
    for dropped in &report.dropped {
        warn!(
            id = dropped.id.as_deref().unwrap_or("?"),
            reason = dropped.reason,
            "record dropped"
        );
    }
    Ok(report.venues)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
