//! The set of scene-graph roots currently attached for rendering

use super::SceneHandle;
use uuid::Uuid;

/// Ordered collection of attached roots
///
/// A root is attached at most once; attaching an already attached handle is
/// a no-op.
#[derive(Debug, Default)]
pub struct Stage {
    roots: Vec<SceneHandle>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a root; returns false if it was already attached
    pub fn attach(&mut self, handle: SceneHandle) -> bool {
        if self.contains(handle.id()) {
            return false;
        }
        self.roots.push(handle);
        true
    }

    /// Detach a root by id
    pub fn detach(&mut self, id: Uuid) -> Option<SceneHandle> {
        let pos = self.roots.iter().position(|h| h.id() == id)?;
        Some(self.roots.remove(pos))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.roots.iter().any(|h| h.id() == id)
    }

    pub fn roots(&self) -> &[SceneHandle] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of attached roots whose root node is visible
    pub fn visible_count(&self) -> usize {
        self.roots.iter().filter(|h| h.read().visible).count()
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }
}
