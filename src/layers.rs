//! The layer model the core reads from the host viewer. A host adapter mirrors its own layer list
//! into a `LayerList`: image layers carry an N-dimensional array plus its world transform, shapes
//! layers carry the user drawn polylines.

mod image;
mod path;
mod shapes;

pub use image::{DeferredArray, ImageData, ImageLayer};
pub use path::Path;
pub use shapes::{PathId, PathShape, ShapesLayer};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a layer inside a `LayerList`, assigned when the layer is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(Uuid);

impl LayerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A heterogeneous host layer. Consumers ask for capabilities with `is_image`/`is_path` and the
/// `as_*` accessors rather than matching on concrete host classes.
#[derive(Debug, Clone)]
pub enum Layer {
    Image(ImageLayer),
    Shapes(ShapesLayer),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Image(l) => l.name(),
            Layer::Shapes(l) => l.name(),
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Layer::Image(l) => l.is_visible(),
            Layer::Shapes(l) => l.is_visible(),
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Layer::Image(l) => l.set_visible(visible),
            Layer::Shapes(l) => l.set_visible(visible),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Layer::Image(_))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Layer::Shapes(_))
    }

    pub fn as_image(&self) -> Option<&ImageLayer> {
        match self {
            Layer::Image(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_shapes(&self) -> Option<&ShapesLayer> {
        match self {
            Layer::Shapes(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_shapes_mut(&mut self) -> Option<&mut ShapesLayer> {
        match self {
            Layer::Shapes(l) => Some(l),
            _ => None,
        }
    }
}

impl From<ImageLayer> for Layer {
    fn from(value: ImageLayer) -> Self {
        Layer::Image(value)
    }
}

impl From<ShapesLayer> for Layer {
    fn from(value: ShapesLayer) -> Self {
        Layer::Shapes(value)
    }
}

#[derive(Debug, Clone)]
struct LayerEntry {
    id: LayerId,
    layer: Layer,
}

/// Ordered list of layers, in the host's order, together with the set of selected layers.
#[derive(Debug, Clone, Default)]
pub struct LayerList {
    entries: Vec<LayerEntry>,
    selection: Vec<LayerId>,
}

impl LayerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a layer to the end of the list, returning its id.
    pub fn add(&mut self, layer: impl Into<Layer>) -> LayerId {
        let id = LayerId::new();
        self.entries.push(LayerEntry {
            id,
            layer: layer.into(),
        });
        id
    }

    /// Remove a layer, also dropping it from the selection.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.selection.retain(|s| *s != id);
        Some(self.entries.remove(index).layer)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.layer)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.layer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.entries.iter().map(|e| (e.id, &e.layer))
    }

    /// Replace the selection. Ids that are not in the list are ignored.
    pub fn set_selection(&mut self, ids: &[LayerId]) {
        self.selection = ids
            .iter()
            .copied()
            .filter(|id| self.entries.iter().any(|e| e.id == *id))
            .collect();
    }

    pub fn select(&mut self, id: LayerId) {
        if !self.selection.contains(&id) && self.entries.iter().any(|e| e.id == id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected layers, in list order rather than in the order they were selected.
    pub fn selected(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.iter().filter(|(id, _)| self.selection.contains(id))
    }

    /// Image layers which are currently visible, in list order.
    pub fn visible_image_layers(&self) -> Vec<&ImageLayer> {
        self.entries
            .iter()
            .filter(|e| e.layer.is_visible())
            .filter_map(|e| e.layer.as_image())
            .collect()
    }

    /// Find the path the profiler should follow. The selected shapes layers are searched in list
    /// order and the first one holding any path decides: its selected path if it has one,
    /// otherwise its most recently added path. Returns `None` when no selected shapes layer has
    /// any paths.
    pub fn active_path(&self) -> Option<&PathShape> {
        self.selected()
            .filter_map(|(_, layer)| layer.as_shapes())
            .find_map(|shapes| shapes.active_shape())
    }
}
