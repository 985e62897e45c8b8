//! Batch cell stitcher.
//!
//! Assembles one 1°×1° latitude/longitude cell from a local Web-Mercator
//! tile cache into a flat equirectangular raster image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mercator::GeoCell;
use stitcher::{stitch_to_file, StitchRequest};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(about = "Stitch cached Web-Mercator tiles into a flat 1°x1° cell image")]
struct Args {
    /// Latitude of the cell's south-west corner (degrees)
    #[arg(long, allow_negative_numbers = true)]
    lat: i32,

    /// Longitude of the cell's south-west corner (degrees)
    #[arg(long, allow_negative_numbers = true)]
    lon: i32,

    /// Tile pyramid zoom level
    #[arg(long)]
    zoom: u32,

    /// Directory holding cached tiles named Z{zoom}-{x}-{y}.{ext}
    #[arg(long, env = "TILE_CACHE_DIR", default_value = "cache/images")]
    cache_dir: PathBuf,

    /// Tile file extension
    #[arg(long, default_value = "jpg")]
    ext: String,

    /// Output image height in pixels
    #[arg(long, default_value = "4096")]
    size: u32,

    /// Output image path (the extension selects the format)
    #[arg(short, long)]
    output: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cell = GeoCell::new(args.lat, args.lon, args.zoom)?;
    let request = StitchRequest {
        cell,
        cache_root: args.cache_dir,
        tile_ext: args.ext,
        output_size: args.size,
    };

    stitch_to_file(&request, &args.output)
        .with_context(|| format!("stitching cell ({}, {})", args.lat, args.lon))?;

    info!(path = %args.output.display(), "done");
    Ok(())
}
