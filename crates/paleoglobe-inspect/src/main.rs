//! Command-line inspector for elevation grids and plate rotation catalogs.
//!
//! Every subcommand loads its data through the same services a globe viewer
//! uses, so the numbers printed here are the numbers the viewer renders.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use glam::DMat4;
use paleoglobe::{
    CatalogSummary, Client, ColorClassifier, Config, ElevationRange, ElevationService,
    FiniteRotation, GridDimensions, RotationService,
};
use serde::Serialize;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(about = "Inspect globe elevation grids and plate rotation catalogs")]
struct Cli {
    /// Base URL that data paths are resolved against.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample the elevation at a coordinate.
    Sample {
        /// Elevation payload: URL, path relative to the base URL, or file.
        #[arg(long)]
        grid: String,
        /// Latitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[command(flatten)]
        dims: DimensionArgs,
    },
    /// Print load-time statistics of an elevation grid.
    Stats {
        /// Elevation payload: URL, path relative to the base URL, or file.
        #[arg(long)]
        grid: String,
        #[command(flatten)]
        dims: DimensionArgs,
    },
    /// Print the display color for an elevation and latitude.
    Classify {
        /// Elevation in meters.
        #[arg(long, allow_negative_numbers = true)]
        elevation: f32,
        /// Latitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Elevation mapped to the top of the color ramp.
        #[arg(long, default_value_t = ElevationRange::default().max_elevation)]
        max_elevation: f32,
        /// Elevation mapped to the bottom of the ocean ramp.
        #[arg(long, allow_negative_numbers = true, default_value_t = ElevationRange::default().min_elevation)]
        min_elevation: f32,
    },
    /// Resolve the rotation of a plate at a time.
    Resolve {
        /// Rotation catalog: URL, path relative to the base URL, or file.
        #[arg(long)]
        catalog: String,
        /// Plate identifier.
        #[arg(long)]
        plate: u32,
        /// Time in millions of years, negative for the past.
        #[arg(long, allow_negative_numbers = true)]
        time: f64,
        /// Clamp the time into the catalog's range first.
        #[arg(long)]
        clamp: bool,
    },
    /// Summarize a rotation catalog and list its plates.
    Plates {
        /// Rotation catalog: URL, path relative to the base URL, or file.
        #[arg(long)]
        catalog: String,
    },
}

#[derive(Args)]
struct DimensionArgs {
    /// Samples per grid row.
    #[arg(long, default_value_t = GridDimensions::default().width)]
    width: usize,
    /// Number of grid rows.
    #[arg(long, default_value_t = GridDimensions::default().height)]
    height: usize,
}

impl DimensionArgs {
    fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.width, self.height)
    }
}

#[derive(Serialize)]
struct SampleOutput {
    lat: f64,
    lon: f64,
    elevation: f32,
}

#[derive(Serialize)]
struct ClassifyOutput {
    elevation: f32,
    lat: f64,
    rgb: [f32; 3],
    hex: String,
}

#[derive(Serialize)]
struct ResolveOutput {
    plate_id: u32,
    time: f64,
    known_plate: bool,
    rotation: Option<FiniteRotation>,
    /// Column-major 4x4 matrix.
    matrix: [[f64; 4]; 4],
}

#[derive(Serialize)]
struct PlateOutput {
    plate_id: u32,
    keyframes: usize,
    earliest: f64,
    latest: f64,
}

#[derive(Serialize)]
struct PlatesOutput {
    summary: CatalogSummary,
    plates: Vec<PlateOutput>,
}

#[tokio::main]
async fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "inspection failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = Config::default();
    let mut client = Client::new();
    if let Some(base_url) = cli.base_url {
        client = client.with_base_url(base_url.clone());
        config = config.with_base_url(base_url);
    }

    match cli.command {
        Command::Sample {
            grid,
            lat,
            lon,
            dims,
        } => {
            let config = config.with_grid(dims.dimensions());
            let service = ElevationService::new(&config);
            service.load(&client, &config.source_for(&grid)).await?;

            let output = SampleOutput {
                lat,
                lon,
                elevation: service.sampler().sample(lat, lon),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{:.2} m at ({lat}, {lon})", output.elevation);
            }
        }
        Command::Stats { grid, dims } => {
            let config = config.with_grid(dims.dimensions());
            let service = ElevationService::new(&config);
            let stats = service.load(&client, &config.source_for(&grid)).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("cells:   {}", stats.finite_cells);
                println!("min:     {:.1} m", stats.min);
                println!("max:     {:.1} m", stats.max);
                println!("mean:    {:.1} m", stats.mean);
                println!(
                    "ocean:   {} cells, land: {} cells",
                    stats.below_sea_level, stats.above_sea_level
                );
                println!(
                    "north:   mean {:.1} m over {} cells",
                    stats.north.mean, stats.north.count
                );
                println!(
                    "south:   mean {:.1} m over {} cells",
                    stats.south.mean, stats.south.count
                );
            }
        }
        Command::Classify {
            elevation,
            lat,
            max_elevation,
            min_elevation,
        } => {
            let classifier =
                ColorClassifier::new(ElevationRange::new(max_elevation, min_elevation));
            let rgb = classifier.classify(elevation, lat);
            let output = ClassifyOutput {
                elevation,
                lat,
                rgb,
                hex: to_hex(rgb),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{} (r {:.3}, g {:.3}, b {:.3})",
                    output.hex, rgb[0], rgb[1], rgb[2]
                );
            }
        }
        Command::Resolve {
            catalog,
            plate,
            time,
            clamp,
        } => {
            let service = RotationService::new();
            service.load(&client, &config.source_for(&catalog)).await?;

            let time = if clamp { service.clamp_time(time) } else { time };
            let rotation = service.interpolate(plate, time);
            let matrix = service.resolve(plate, time);
            let output = ResolveOutput {
                plate_id: plate,
                time,
                known_plate: service.index().is_some_and(|index| index.contains(plate)),
                rotation,
                matrix: matrix.to_cols_array_2d(),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match rotation {
                    Some(r) => println!(
                        "plate {plate} at {time} Ma: pole ({:.4}, {:.4}), angle {:.4}",
                        r.lat, r.lon, r.angle
                    ),
                    None if output.known_plate => {
                        println!("plate {plate} has no rotation at or before {time} Ma");
                    }
                    None => println!("plate {plate} is not in the catalog"),
                }
                print!("{}", format_matrix(&matrix));
            }
        }
        Command::Plates { catalog } => {
            let service = RotationService::new();
            let summary = service.load(&client, &config.source_for(&catalog)).await?;

            let plates: Vec<PlateOutput> = service
                .index()
                .map(|index| {
                    index
                        .plate_ids()
                        .filter_map(|id| {
                            let keyframes = index.rotations(id)?;
                            Some(PlateOutput {
                                plate_id: id,
                                keyframes: keyframes.len(),
                                earliest: keyframes.first()?.time,
                                latest: keyframes.last()?.time,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            let output = PlatesOutput { summary, plates };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{} rotations, {} plates, {} to {} Ma",
                    summary.total_rotations,
                    summary.unique_plates,
                    summary.time_range.min,
                    summary.time_range.max
                );
                for plate in &output.plates {
                    println!(
                        "{:>6}  {:>4} keyframes  {} to {} Ma",
                        plate.plate_id, plate.keyframes, plate.earliest, plate.latest
                    );
                }
            }
        }
    }

    Ok(())
}

fn to_hex(rgb: [f32; 3]) -> String {
    // Channels are clamped to [0, 1] first, so the scaled value fits in a byte.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

fn format_matrix(matrix: &DMat4) -> String {
    // Print row by row; glam stores columns.
    let rows = matrix.transpose().to_cols_array_2d();
    rows.iter()
        .map(|row| {
            format!(
                "[{:>9.5} {:>9.5} {:>9.5} {:>9.5}]\n",
                row[0], row[1], row[2], row[3]
            )
        })
        .collect()
}
