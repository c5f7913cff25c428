//! Per-slot load state for background model sets

use super::LoadResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// Represents the current state of one slot in a model set
///
/// A slot moves `Pending -> Loading -> Placeholder | Ready` and never holds
/// a partially built model: results are published in a single write.
#[derive(Debug, Clone)]
pub enum SlotState {
    /// Loading has not started yet
    Pending,

    /// Candidate paths are being tried
    Loading,

    /// Every candidate failed; a synthesized model is available
    Placeholder(LoadResult),

    /// A real model was parsed
    Ready(LoadResult),
}

impl SlotState {
    /// The published result, if any
    pub fn result(&self) -> Option<&LoadResult> {
        match self {
            Self::Placeholder(result) | Self::Ready(result) => Some(result),
            Self::Pending | Self::Loading => None,
        }
    }

    /// Whether a result has been published
    pub fn is_settled(&self) -> bool {
        self.result().is_some()
    }
}

/// Shared handle to one slot
#[derive(Debug, Clone)]
pub struct SlotHandle {
    index: usize,
    state: Arc<RwLock<SlotState>>,
}

impl SlotHandle {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: Arc::new(RwLock::new(SlotState::Pending)),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the current state
    pub fn state(&self) -> SlotState {
        self.state.read().clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.read(), SlotState::Pending)
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.read(), SlotState::Pending | SlotState::Loading)
    }

    /// Check if a real model is available
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), SlotState::Ready(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(*self.state.read(), SlotState::Placeholder(_))
    }

    /// Get the published result, if any
    pub fn result(&self) -> Option<LoadResult> {
        self.state.read().result().cloned()
    }

    pub(crate) fn mark_loading(&self) {
        *self.state.write() = SlotState::Loading;
    }

    /// Publish a finished load
    pub(crate) fn publish(&self, result: LoadResult) {
        let state = if result.is_placeholder() {
            SlotState::Placeholder(result)
        } else {
            SlotState::Ready(result)
        };
        *self.state.write() = state;
    }
}

/// Slots of a background model set plus its completion channel
///
/// Each slot index is sent on `completions` exactly once, after the slot's
/// result has been published.
#[derive(Debug)]
pub struct ModelSet {
    pub slots: Vec<SlotHandle>,
    pub completions: futures::channel::mpsc::UnboundedReceiver<usize>,
}

impl ModelSet {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&SlotHandle> {
        self.slots.get(index)
    }

    /// Number of slots that have published a result
    pub fn settled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.state().is_settled()).count()
    }
}
