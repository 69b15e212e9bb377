//! Shapes layers holding user drawn paths.

use super::Path;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Stable identifier of a path within a shapes layer. Ids are assigned when a path is added and
/// never reused, so metadata keyed by them survives deletions and insertions of other paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(Uuid);

impl PathId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone)]
pub struct PathShape {
    id: PathId,
    path: Path,
}

impl PathShape {
    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct ShapesLayer {
    name: String,
    shapes: Vec<PathShape>,
    selected: HashSet<PathId>,
    visible: bool,
}

impl ShapesLayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shapes: Vec::new(),
            selected: HashSet::new(),
            visible: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Paths in the order they were added.
    pub fn shapes(&self) -> &[PathShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn add_path(&mut self, path: Path) -> PathId {
        let id = PathId::new();
        self.shapes.push(PathShape { id, path });
        id
    }

    pub fn get(&self, id: PathId) -> Option<&Path> {
        self.shapes.iter().find(|s| s.id == id).map(|s| &s.path)
    }

    /// Replace the geometry of an existing path, keeping its id. Returns false if the id is
    /// unknown.
    pub fn replace_path(&mut self, id: PathId, path: Path) -> bool {
        match self.shapes.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                shape.path = path;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PathId) -> Option<Path> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        self.selected.remove(&id);
        Some(self.shapes.remove(index).path)
    }

    /// Add a path to the selection. Returns false if the id is unknown.
    pub fn select(&mut self, id: PathId) -> bool {
        if self.shapes.iter().any(|s| s.id == id) {
            self.selected.insert(id);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self, id: PathId) {
        self.selected.remove(&id);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<PathId> {
        self.shapes
            .iter()
            .filter(|s| self.selected.contains(&s.id))
            .map(|s| s.id)
            .collect()
    }

    /// The path this layer offers to the profiler: the most recently added selected path, or the
    /// most recently added path if nothing is selected.
    pub fn active_shape(&self) -> Option<&PathShape> {
        self.shapes
            .iter()
            .rev()
            .find(|s| self.selected.contains(&s.id))
            .or_else(|| self.shapes.last())
    }
}
