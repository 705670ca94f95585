//! [Layers](Layer) specify a data source and the way the data should be rendered to the map.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::messenger::Messenger;
use crate::render::Canvas;
use crate::view::MapView;

pub mod attribution;
pub mod earthquake_layer;
pub mod plate_layer;
pub mod raster_tile_layer;

pub use attribution::Attribution;
pub use earthquake_layer::{build_earthquake_layer, EarthquakeLayer, Marker};
pub use plate_layer::{build_plate_layer, PlateLayer};
pub use raster_tile_layer::RasterTileLayer;

/// Layers specify a data source and the way the data should be rendered to the map.
///
/// There are 3 types of layers:
/// * [`RasterTileLayer`] - downloads prerendered tiles of a base map and draws them as is.
/// * [`EarthquakeLayer`] - circle markers of earthquake events.
/// * [`PlateLayer`] - lines of the tectonic plate boundaries.
pub trait Layer: Send + Sync {
    /// Renders the layer to the given canvas.
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas);
    /// Prepares the layer for rendering with the given `view`. The preparation may include data
    /// downloading or decoding which cannot be awaited for during render cycle.
    fn prepare(&self, _view: &MapView) {}
    /// Sets the messenger for the layer. Messenger is used to notify the application when the
    /// layer thinks it should be updated on the screen.
    fn set_messenger(&mut self, _messenger: Arc<dyn Messenger>) {}
    /// A map stores layers as trait objects. This method can be used to convert the trait object
    /// into the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// A map stores layers as trait objects. This method can be used to convert the trait object
    /// into the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Returns the attribution of the layer, if available.
    fn attribution(&self) -> Option<Attribution> {
        None
    }
}

/// Shared slot for a layer that is built after its data arrives.
///
/// A group starts empty (pending). The task that loads the data holds a clone of the group and
/// [attaches](LayerGroup::attach) the built layer exactly once. Until then the group renders
/// nothing.
pub struct LayerGroup<L> {
    layer: Arc<RwLock<Option<L>>>,
}

impl<L> Clone for LayerGroup<L> {
    fn clone(&self) -> Self {
        Self {
            layer: self.layer.clone(),
        }
    }
}

impl<L> Default for LayerGroup<L> {
    fn default() -> Self {
        Self {
            layer: Arc::new(RwLock::new(None)),
        }
    }
}

impl<L> std::fmt::Debug for LayerGroup<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerGroup")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<L> LayerGroup<L> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a layer was attached to the group.
    pub fn is_attached(&self) -> bool {
        self.layer.read().is_some()
    }

    /// Puts the layer into the group. A layer attached earlier is replaced.
    pub fn attach(&self, layer: L) {
        *self.layer.write() = Some(layer);
    }

    /// Locks the group for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Option<L>> {
        self.layer.read()
    }
}

impl<L: Layer + 'static> Layer for LayerGroup<L> {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        if let Some(layer) = &*self.layer.read() {
            layer.render(view, canvas);
        }
    }

    fn prepare(&self, view: &MapView) {
        if let Some(layer) = &*self.layer.read() {
            layer.prepare(view);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        self.layer.read().as_ref().and_then(|layer| layer.attribution())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::test_canvas::RecordingCanvas;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TestLayer(pub &'static str);

    impl Layer for TestLayer {
        fn render(&self, _view: &MapView, _canvas: &mut dyn Canvas) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn attribution(&self) -> Option<Attribution> {
            Some(Attribution::new(self.0, None))
        }
    }

    #[test]
    fn group_is_pending_until_attached() {
        let group = LayerGroup::<TestLayer>::new();
        let handle = group.clone();
        assert!(!group.is_attached());
        assert_eq!(group.attribution(), None);

        handle.attach(TestLayer("attached"));
        assert!(group.is_attached());
        assert_eq!(group.read().as_ref(), Some(&TestLayer("attached")));
        assert_eq!(group.attribution().unwrap().text(), "attached");
    }

    #[test]
    fn empty_group_renders_nothing() {
        let group = LayerGroup::<TestLayer>::new();
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        group.render(&MapView::default(), &mut canvas);
        assert!(canvas.calls.is_empty());
    }
}
