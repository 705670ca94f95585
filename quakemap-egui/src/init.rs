use eframe::AppCreator;
use quakemap::{MapBuilder, MapConfig, PlatformService, QuakeMapError};
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::EguiMapState;

const WINDOW_TITLE: &str = "Earthquakes and Tectonic Plates";

/// Failure to start the application.
#[derive(Debug, Error)]
pub enum InitError {
    /// Async runtime could not be created.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    /// Map could not be built from the configuration.
    #[error("failed to create the map: {0}")]
    Map(#[from] QuakeMapError),
    /// Window could not be created or the event loop failed.
    #[error("failed to run the window: {0}")]
    Window(#[from] eframe::Error),
}

struct MapApp {
    map: EguiMapState,
}

impl eframe::App for MapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                self.map.render(ui);
            });
    }
}

/// Starts the native map window.
///
/// ```no_run
/// use quakemap::MapConfig;
/// use quakemap_egui::InitBuilder;
///
/// InitBuilder::new(MapConfig::default()).init().unwrap();
/// ```
pub struct InitBuilder {
    config: MapConfig,
    native_options: Option<eframe::NativeOptions>,
}

impl InitBuilder {
    /// Creates a builder for the map described by the configuration.
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            native_options: None,
        }
    }

    /// Overrides the default window options.
    pub fn with_native_options(mut self, options: eframe::NativeOptions) -> Self {
        self.native_options = Some(options);
        self
    }

    /// Initializes logging and the async runtime, starts loading both feeds and runs the window
    /// until it is closed.
    pub fn init(self) -> Result<(), InitError> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let rt = Runtime::new()?;
        let _enter = rt.enter();

        let platform_service = PlatformService::new(&self.config.user_agent)?;
        let map = MapBuilder::from_config(&self.config, &platform_service)?.build();
        log::info!(
            "Starting map at {:?}, zoom {}",
            self.config.center,
            self.config.zoom
        );

        let native_options = self.native_options.unwrap_or_default();
        let app_creator = app_creator(map, self.config, platform_service);
        eframe::run_native(WINDOW_TITLE, native_options, app_creator)?;

        Ok(())
    }
}

fn app_creator<'app>(
    map: quakemap::Map,
    config: MapConfig,
    platform_service: PlatformService,
) -> AppCreator<'app> {
    Box::new(move |cc: &eframe::CreationContext<'_>| {
        let state = EguiMapState::new(map, cc.egui_ctx.clone());
        // Feeds are loaded after the messenger is set.
        state
            .map()
            .load_configured_feeds(&config, &platform_service);
        let app: Box<dyn eframe::App> = Box::new(MapApp { map: state });
        Ok(app)
    })
}
