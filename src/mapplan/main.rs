// Copyright Catenary Transit Initiatives
// Command line front-end for the ad map engine

use admap::ad_source::{generate_mock_ads, load_ads_from_json};
use admap::display_plan::DisplayMode;
use admap::{EngineConfig, GroupKey, LatLng, MapEvent, MapSession};
use anyhow::{Context, anyhow, bail};
use clap::Parser;
use geo_types::{Rect, coord};
use itertools::Itertools;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine config as JSON. Can also be set via ADMAP_CONFIG env var.
    #[arg(long, env = "ADMAP_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print generated mock ads as JSON
    Mock {
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the map plan and side panel for one viewport
    Plan {
        /// JSON file with the ad list
        #[arg(long, conflicts_with = "mock")]
        ads: Option<PathBuf>,
        /// Use this many generated ads instead of a file
        #[arg(long)]
        mock: Option<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Current zoom. Without it the plan stays idle.
        #[arg(long, allow_hyphen_values = true)]
        zoom: Option<f64>,
        /// Visible rectangle as south,west,north,east
        #[arg(long, allow_hyphen_values = true)]
        bounds: Option<String>,
        /// Filter area as lat,lng;lat,lng;...
        #[arg(long, allow_hyphen_values = true)]
        polygon: Option<String>,
        /// Group to select: a city name when zoomed out, a group index when zoomed in
        #[arg(long)]
        select: Option<String>,
    },
}

fn parse_bounds(raw: &str) -> anyhow::Result<Rect<f64>> {
    let (south, west, north, east) = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect_tuple()
        .ok_or_else(|| {
            anyhow!(
                "bounds must be south,west,north,east, got '{}'",
                raw
            )
        })?;

    Ok(Rect::new(
        coord! { x: west?, y: south? },
        coord! { x: east?, y: north? },
    ))
}

fn parse_polygon(raw: &str) -> anyhow::Result<Vec<LatLng>> {
    raw.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| -> anyhow::Result<LatLng> {
            let (lat, lng) = pair
                .split(',')
                .map(|part| part.trim().parse::<f64>())
                .collect_tuple()
                .ok_or_else(|| anyhow!("polygon vertex must be lat,lng, got '{}'", pair))?;
            Ok(LatLng::new(lat?, lng?))
        })
        .collect()
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config.as_ref())?;

    match args.cmd {
        Command::Mock { count, seed } => {
            let ads = generate_mock_ads(count, seed);
            println!("{}", serde_json::to_string_pretty(&ads)?);
        }
        Command::Plan {
            ads,
            mock,
            seed,
            zoom,
            bounds,
            polygon,
            select,
        } => {
            let ads = match (ads, mock) {
                (Some(path), _) => load_ads_from_json(&path)?,
                (None, Some(count)) => generate_mock_ads(count, seed),
                (None, None) => bail!("either --ads or --mock is required"),
            };

            let mut session = MapSession::with_ads(config, ads);
            let mut camera = None;

            if let Some(raw) = polygon {
                camera = session.handle(MapEvent::PolygonCommitted(parse_polygon(&raw)?));
            }
            if let Some(zoom) = zoom {
                session.handle(MapEvent::ZoomChanged(zoom));
            }
            if let Some(raw) = bounds {
                session.handle(MapEvent::BoundsChanged(parse_bounds(&raw)?));
            }

            let plan = session.plan();
            let panel = session.panel();

            let groups: Vec<_> = plan
                .groups
                .iter()
                .map(|group| {
                    json!({
                        "key": group.key.to_string(),
                        "count": group.count,
                        "centroid": group.centroid,
                        "average_price": group.average_price,
                        "member_ids": group.members.iter().map(|a| a.id).collect::<Vec<_>>(),
                    })
                })
                .collect();

            let selection = match select {
                Some(raw) => {
                    let key = match plan.mode {
                        Some(DisplayMode::Detailed) => GroupKey::Proximity(
                            raw.parse().with_context(|| format!("group index '{}'", raw))?,
                        ),
                        _ => GroupKey::City(raw.clone()),
                    };
                    let selected = session
                        .select_group(&key)
                        .ok_or_else(|| anyhow!("no group '{}' in the current plan", raw))?;
                    Some(json!({
                        "key": selected.key.to_string(),
                        "member_ids": selected.members.iter().map(|a| a.id).collect::<Vec<_>>(),
                        "summary": selected.summary,
                        "camera": selected.camera,
                        "camera_target": selected.camera.target(),
                    }))
                }
                None => None,
            };

            let output = json!({
                "mode": plan.mode,
                "markers": plan.markers(),
                "groups": groups,
                "panel": {
                    "label": panel.label.to_string(),
                    "ad_ids": panel.ads.iter().map(|a| a.id).collect::<Vec<_>>(),
                },
                "camera": camera,
                "camera_target": camera.as_ref().map(|request| request.target()),
                "selection": selection,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
