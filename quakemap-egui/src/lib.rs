//! Egui front end of the earthquake map.

mod controls;
mod egui_map;
pub use egui_map::{EguiCanvas, EguiMapState, MapStateMessenger};

#[cfg(feature = "init")]
mod init;
#[cfg(feature = "init")]
pub use init::{InitBuilder, InitError};
