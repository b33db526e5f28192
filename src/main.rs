extern crate log;
pub mod geodata;
pub mod geofile;
pub mod scene;
use crate::geodata::filter::MatchConfig;
use crate::geodata::provider::{DataSource, GeoDataProvider};
use crate::geodata::source::{HttpWorldSource, OfflineWorldSource, SourceConfig, WorldSource};
use crate::geodata::status::LogStatusSink;
use crate::geofile::region::regions_from_collection;
use crate::scene::context::{SceneContext, SceneParams};
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Resolve India's state boundaries and plan a population-extruded 3D map.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML config file.
    #[arg(short, long)]
    config_filepath: Option<String>,

    /// Skip the remote source and use the embedded state boundaries.
    #[arg(long)]
    offline: bool,

    /// Write the resolved GeoJSON to this path.
    #[arg(short, long)]
    output_geojson: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
struct Config {
    source: SourceConfig,
    matching: MatchConfig,
    scene: SceneParams,
    output_geojson: Option<PathBuf>,
}

fn parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args)
}

fn load_config(config_filepath: Option<&str>) -> anyhow::Result<Config> {
    let config_filepath = match config_filepath {
        Some(config_filepath) => config_filepath,
        None => return Ok(Config::default()),
    };
    if !Path::new(config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", config_filepath));
    }
    let config_contents = read_to_string(config_filepath)?;
    serde_yaml::from_str(&config_contents)
        .with_context(|| format!("Parsing config file {}", config_filepath))
}

fn resolve_collection(
    source: impl WorldSource,
    matching: MatchConfig,
) -> anyhow::Result<(DataSource, geojson::FeatureCollection)> {
    let provider = GeoDataProvider::new(source, LogStatusSink, matching)?;
    Ok(provider.resolve_with_source())
}

fn try_main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();

    // Help, version and usage errors are printed by clap with its own exit codes.
    let args = parse_args(std::env::args_os()).unwrap_or_else(|err| err.exit());
    let config = load_config(args.config_filepath.as_deref())?;

    let (data_source, collection) = if args.offline {
        resolve_collection(OfflineWorldSource, config.matching.clone())?
    } else {
        resolve_collection(
            HttpWorldSource::new(&config.source)?,
            config.matching.clone(),
        )?
    };
    log::info!(
        "Resolved {} feature(s) from the {:?} source",
        collection.features.len(),
        data_source
    );

    if let Some(output_filepath) = args.output_geojson.or(config.output_geojson) {
        log::info!("Writing resolved GeoJSON to {:?}", &output_filepath);
        geofile::geojson::write_feature_collection(&collection, &output_filepath)?;
    }

    // Embedded states are keyed by `name`, which may not be among the configured keys.
    let mut name_keys = config.matching.name_keys.clone();
    if !name_keys.iter().any(|key| key == "name") {
        name_keys.push("name".to_string());
    }
    let regions = regions_from_collection(&collection, &name_keys)?;
    let scene = SceneContext::build(&regions, &config.scene)?;
    for region in scene.regions() {
        log::info!(
            "{:<16} population {:>11}  height {:>5.2}  area {:>7.2}  color #{:02x}{:02x}{:02x}",
            region.name,
            region.population,
            region.height,
            region.footprint_area(),
            region.color[0],
            region.color[1],
            region.color[2]
        );
    }
    if let Some(top) = scene.most_populous() {
        log::info!(
            "Total population {}, most populous {} ({})",
            scene.total_population(),
            top.name,
            top.capital
        );
    }
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
