//! Quakemap shows recent earthquakes and tectonic plate boundaries on top of a choice of base
//! maps.
//!
//! Earthquakes come from the USGS GeoJSON feed and are drawn as circles sized by magnitude and
//! colored by depth. Plate boundaries are drawn as lines. Both overlays, together with the
//! street, satellite and topographic base maps, can be switched with a [layer control](control).
//!
//! # Quick start
//!
//! ```no_run
//! use quakemap::{MapBuilder, MapConfig, PlatformService};
//!
//! # tokio_test::block_on(async {
//! let config = MapConfig::default();
//! let platform_service = PlatformService::new(&config.user_agent)?;
//! let map = MapBuilder::from_config(&config, &platform_service)?.build();
//!
//! // Overlays are attached in the background when the feeds arrive.
//! map.load_configured_feeds(&config, &platform_service);
//! # Ok::<(), quakemap::QuakeMapError>(())
//! # });
//! ```
//!
//! The map itself does not draw pixels. A front end implements [`render::Canvas`] and calls
//! [`Map::render`] whenever the [`Messenger`] asks for a redraw.

pub mod async_runtime;
mod color;
pub mod config;
pub mod control;
pub mod decoded_image;
pub mod depth;
pub mod error;
pub mod feed;
pub mod layer;
pub mod legend;
pub mod map;
pub mod messenger;
pub mod platform;
pub mod popup;
pub mod render;
pub mod tile_schema;
pub mod view;

pub use color::Color;
pub use config::MapConfig;
pub use control::LayerControl;
pub use depth::{color_for_depth, DepthClassifier};
pub use error::QuakeMapError;
pub use legend::Legend;
pub use map::{Map, MapBuilder};
pub use messenger::Messenger;
pub use platform::PlatformService;
pub use popup::Popup;
pub use quakemap_types;
pub use view::MapView;
