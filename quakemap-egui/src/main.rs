use std::path::PathBuf;

use clap::Parser;
use quakemap::layer::raster_tile_layer::BaseLayerKind;
use quakemap::MapConfig;
use quakemap_egui::{InitBuilder, InitError};

/// Map of the earthquakes of the past week and the tectonic plate boundaries.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base map shown on start: street, satellite or topographic.
    #[arg(long)]
    base: Option<BaseLayerKind>,
    /// Url or path of the earthquake GeoJSON feed.
    #[arg(long)]
    earthquake_feed: Option<String>,
    /// Url or path of the plate boundaries GeoJSON feed.
    #[arg(long)]
    plates_feed: Option<String>,
    /// Folder to keep downloaded tiles in.
    #[arg(long)]
    tile_cache_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<MapConfig, InitError> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_file(path)?,
            None => MapConfig::default(),
        };

        if let Some(base) = self.base {
            config.base_layer = base;
        }
        if let Some(feed) = self.earthquake_feed {
            config.earthquake_feed = feed;
        }
        if let Some(feed) = self.plates_feed {
            config.plates_feed = feed;
        }
        if let Some(dir) = self.tile_cache_dir {
            config.tile_cache_dir = Some(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), InitError> {
    let config = Args::parse().into_config()?;
    InitBuilder::new(config).init()
}
