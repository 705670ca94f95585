//! Switching of base maps and overlays.

use std::sync::Arc;

use crate::layer::{Attribution, Layer};
use crate::map::LayerCollection;
use crate::messenger::Messenger;

/// Name of the earthquake overlay in the layer control.
pub const EARTHQUAKES_OVERLAY: &str = "Earthquakes";

/// Name of the plate boundary overlay in the layer control.
pub const PLATES_OVERLAY: &str = "Tectonic Plates";

/// Base layers, of which exactly one is visible, and overlays, each toggled on its own.
///
/// ```
/// use quakemap::control::LayerControl;
/// use quakemap::layer::EarthquakeLayer;
/// use quakemap::map::LayerCollection;
///
/// let mut base = LayerCollection::default();
/// base.push("Street", EarthquakeLayer::default());
/// base.push("Satellite", EarthquakeLayer::default());
///
/// let mut control = LayerControl::new(base, LayerCollection::default());
/// assert_eq!(control.selected_base(), Some(0));
///
/// control.select_base(1);
/// assert_eq!(control.selected_base(), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct LayerControl {
    base: LayerCollection,
    overlays: LayerCollection,
}

impl LayerControl {
    /// Creates the control. The first base layer is selected, all overlays are visible.
    pub fn new(mut base: LayerCollection, mut overlays: LayerCollection) -> Self {
        base.show_by(|index, _| index == 0);
        overlays.show_by(|_, _| true);
        Self { base, overlays }
    }

    /// Base layer collection.
    pub fn base_layers(&self) -> &LayerCollection {
        &self.base
    }

    /// Overlay collection.
    pub fn overlays(&self) -> &LayerCollection {
        &self.overlays
    }

    /// Names of the base layers in display order.
    pub fn base_names(&self) -> Vec<&str> {
        self.base.names().collect()
    }

    /// Names of the overlays in display order.
    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.names().collect()
    }

    /// Index of the visible base layer.
    pub fn selected_base(&self) -> Option<usize> {
        (0..self.base.len()).find(|&index| self.base.is_visible(index))
    }

    /// Shows the base layer at `index` and hides all others. Returns false and changes nothing
    /// if there is no such layer.
    pub fn select_base(&mut self, index: usize) -> bool {
        if index >= self.base.len() {
            return false;
        }

        self.base.show_by(|i, _| i == index);
        true
    }

    /// Returns true if the overlay at `index` exists and is visible.
    pub fn is_overlay_visible(&self, index: usize) -> bool {
        index < self.overlays.len() && self.overlays.is_visible(index)
    }

    /// Shows or hides one overlay. Returns false if there is no such overlay.
    pub fn set_overlay_visible(&mut self, index: usize, visible: bool) -> bool {
        if index >= self.overlays.len() {
            return false;
        }

        if visible {
            self.overlays.show(index);
        } else {
            self.overlays.hide(index);
        }
        true
    }

    /// Flips visibility of one overlay. Returns false if there is no such overlay.
    pub fn toggle_overlay(&mut self, index: usize) -> bool {
        let visible = self.is_overlay_visible(index);
        self.set_overlay_visible(index, !visible)
    }

    /// Visible layers in drawing order: the selected base layer first, then the visible overlays
    /// from the last listed to the first listed, so that the first overlay ends up on top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &dyn Layer> + '_ {
        self.base
            .iter_visible()
            .chain(self.overlays.iter_visible().rev())
    }

    /// Attributions of the visible layers.
    pub fn attributions(&self) -> Vec<Attribution> {
        self.visible_layers()
            .filter_map(|layer| layer.attribution())
            .collect()
    }

    /// Sets the messenger for every layer of the control.
    pub fn set_messenger(&mut self, messenger: Arc<dyn Messenger>) {
        for layer in self.base.iter_mut().chain(self.overlays.iter_mut()) {
            layer.set_messenger(messenger.clone());
        }
    }
}
