use std::ops::Index;

use crate::layer::Layer;

/// Named collection of layers.
///
/// When a map is rendered, it draws all visible layers in the order they are stored in the
/// collection. Any layer can be temporary hidden with the [`LayerCollection::hide`] or
/// [`LayerCollection::show_by`] methods. These layers will be ignored by the renderer, but
/// retain their place in the collection.
///
/// Layers are stored as trait objects. Use downcasting through `Any` to obtain the concrete
/// layer type.
///
/// ```
/// use quakemap::layer::EarthquakeLayer;
/// use quakemap::map::LayerCollection;
///
/// let mut collection = LayerCollection::default();
/// collection.push("Earthquakes", EarthquakeLayer::default());
///
/// assert_eq!(collection.name(0), Some("Earthquakes"));
/// assert!(collection[0].as_any().downcast_ref::<EarthquakeLayer>().is_some());
/// ```
#[derive(Default)]
pub struct LayerCollection(Vec<LayerEntry>);

struct LayerEntry {
    name: String,
    layer: Box<dyn Layer>,
    is_hidden: bool,
}

impl std::fmt::Debug for LayerCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|entry| (&entry.name, !entry.is_hidden)))
            .finish()
    }
}

impl LayerCollection {
    /// Adds a visible layer to the end of the collection.
    pub fn push(&mut self, name: impl Into<String>, layer: impl Layer + 'static) {
        self.0.push(LayerEntry {
            name: name.into(),
            layer: Box::new(layer),
            is_hidden: false,
        });
    }

    /// Number of layers in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection has no layers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the layer at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&dyn Layer> {
        self.0.get(index).map(|entry| &*entry.layer)
    }

    /// Returns a mutable reference to the layer at `index`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn Layer>> {
        self.0.get_mut(index).map(|entry| &mut entry.layer)
    }

    /// Name of the layer at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|entry| entry.name.as_str())
    }

    /// Names of all layers in collection order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|entry| entry.name.as_str())
    }

    /// Iterates over all layers in the collection.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> + '_ {
        self.0.iter().map(|entry| &*entry.layer)
    }

    /// Iterates over mutable references to all layers in the collection.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Layer>> + '_ {
        self.0.iter_mut().map(|entry| &mut entry.layer)
    }

    /// Sets the layer at `index` as invisible.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn hide(&mut self, index: usize) {
        self.0[index].is_hidden = true;
    }

    /// Sets the layer at `index` as visible.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn show(&mut self, index: usize) {
        self.0[index].is_hidden = false;
    }

    /// Sets all layers for which the predicate returns true as visible. The rest of layers are set
    /// as hidden. The predicate receives the index and the name of the layer.
    ///
    /// ```
    /// use quakemap::layer::EarthquakeLayer;
    /// use quakemap::map::LayerCollection;
    ///
    /// let mut collection = LayerCollection::default();
    /// collection.push("A", EarthquakeLayer::default());
    /// collection.push("B", EarthquakeLayer::default());
    ///
    /// collection.show_by(|_, name| name == "B");
    ///
    /// assert!(!collection.is_visible(0));
    /// assert!(collection.is_visible(1));
    /// ```
    pub fn show_by<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &str) -> bool,
    {
        for (index, entry) in self.0.iter_mut().enumerate() {
            entry.is_hidden = !f(index, entry.name.as_str());
        }
    }

    /// Returns true, if the layer at `index` is not hidden.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn is_visible(&self, index: usize) -> bool {
        !self.0[index].is_hidden
    }

    /// Iterates over all visible layers in the collection.
    pub fn iter_visible(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> + '_ {
        self.0
            .iter()
            .filter(|entry| !entry.is_hidden)
            .map(|entry| &*entry.layer)
    }
}

impl Index<usize> for LayerCollection {
    type Output = dyn Layer;

    fn index(&self, index: usize) -> &Self::Output {
        &*self.0[index].layer
    }
}
