//! Carousel state for a set of loaded models
//!
//! [`Showcase`] owns the stage and the per-slot results for one viewer. Only
//! the displayed slot is attached to the stage. Results may arrive in any
//! order; a real model always wins over a placeholder, and a placeholder
//! never replaces a real model.

use crate::error::{AssetError, Result};
use crate::pipeline::{LoadResult, ModelSet};
use crate::scene::Stage;

/// What [`Showcase::apply`] did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The slot was empty
    Filled,
    /// The slot's previous result was replaced
    Replaced,
    /// The slot already holds a real model; the placeholder was dropped
    Ignored,
}

/// Viewer context: stage, slots and the displayed index
#[derive(Debug)]
pub struct Showcase {
    stage: Stage,
    slots: Vec<Option<LoadResult>>,
    current: usize,
}

impl Showcase {
    /// Empty showcase with `count` slots, displaying slot 0
    pub fn new(count: usize) -> Self {
        Self {
            stage: Stage::new(),
            slots: vec![None; count],
            current: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the displayed slot
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slot(&self, index: usize) -> Option<&LoadResult> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Result of the displayed slot, if it has one yet
    pub fn displayed(&self) -> Option<&LoadResult> {
        self.slot(self.current)
    }

    /// Store `result` for slot `index`
    pub fn apply(&mut self, index: usize, result: LoadResult) -> Result<SlotUpdate> {
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            AssetError::InvalidArgument(format!("slot {index} out of range"))
        })?;

        let update = match slot {
            Some(existing) if !existing.is_placeholder() && result.is_placeholder() => {
                log::debug!("Keeping real model in slot {index}");
                return Ok(SlotUpdate::Ignored);
            }
            Some(_) => SlotUpdate::Replaced,
            None => SlotUpdate::Filled,
        };

        let previous = slot.replace(result);
        if index == self.current {
            if let Some(previous) = previous {
                self.stage.detach(previous.scene_root.id());
            }
            self.reveal(index);
        } else {
            self.conceal(index);
        }
        Ok(update)
    }

    /// Apply every result already announced on the set's completion channel
    ///
    /// Returns the number of slots applied.
    pub fn absorb(&mut self, set: &mut ModelSet) -> Result<usize> {
        let mut applied = 0;
        while let Ok(Some(index)) = set.completions.try_next() {
            if let Some(result) = set.slot(index).and_then(|slot| slot.result()) {
                self.apply(index, result)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Display slot `index`, hiding the previous one
    ///
    /// Returns whether the slot had a model to show.
    pub fn show(&mut self, index: usize) -> Result<bool> {
        if index >= self.slots.len() {
            return Err(AssetError::InvalidArgument(format!(
                "slot {index} out of range"
            )));
        }
        if index != self.current {
            self.conceal(self.current);
            self.current = index;
        }
        Ok(self.reveal(index))
    }

    /// Advance to the next slot, wrapping around
    pub fn next(&mut self) -> Result<bool> {
        if self.slots.is_empty() {
            return Ok(false);
        }
        self.show((self.current + 1) % self.slots.len())
    }

    /// Go back one slot, wrapping around
    pub fn previous(&mut self) -> Result<bool> {
        if self.slots.is_empty() {
            return Ok(false);
        }
        let len = self.slots.len();
        self.show((self.current + len - 1) % len)
    }

    fn reveal(&mut self, index: usize) -> bool {
        let Some(result) = self.slot(index) else {
            return false;
        };
        let root = result.scene_root.clone();
        root.write().visible = true;
        self.stage.attach(root);
        true
    }

    fn conceal(&mut self, index: usize) {
        if let Some(result) = self.slot(index) {
            let root = result.scene_root.clone();
            root.write().visible = false;
            self.stage.detach(root.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{synthesize, PlaceholderSpec};
    use crate::pipeline::{AssetInfo, Provenance};
    use crate::scene::{ProceduralMeshFactory, SceneHandle, SceneNode};

    fn placeholder(index: usize) -> LoadResult {
        synthesize(
            &PlaceholderSpec::showcase_cube(),
            index,
            &ProceduralMeshFactory::new(),
        )
    }

    fn real(path: &str) -> LoadResult {
        let mut result = LoadResult::placeholder(
            SceneHandle::new(SceneNode::group(Some(path.to_string()))),
            AssetInfo {
                generator: "test".to_string(),
                version: Some("2.0".to_string()),
            },
        );
        result.provenance = Provenance::Parsed {
            path: path.to_string(),
        };
        result
    }

    #[test]
    fn test_first_result_is_displayed() {
        let mut showcase = Showcase::new(3);
        assert_eq!(showcase.apply(0, placeholder(0)).unwrap(), SlotUpdate::Filled);
        assert_eq!(showcase.stage().len(), 1);
        assert_eq!(showcase.stage().visible_count(), 1);
    }

    #[test]
    fn test_background_slots_stay_hidden() {
        let mut showcase = Showcase::new(3);
        showcase.apply(2, real("c.glb")).unwrap();
        assert!(showcase.stage().is_empty());
        assert!(!showcase.slot(2).unwrap().scene_root.read().visible);
    }

    #[test]
    fn test_real_replaces_displayed_placeholder() {
        let mut showcase = Showcase::new(2);
        let stand_in = placeholder(0);
        let stand_in_id = stand_in.scene_root.id();
        showcase.apply(0, stand_in).unwrap();

        let model = real("a.glb");
        let model_id = model.scene_root.id();
        assert_eq!(showcase.apply(0, model).unwrap(), SlotUpdate::Replaced);
        assert!(!showcase.stage().contains(stand_in_id));
        assert!(showcase.stage().contains(model_id));
        assert_eq!(showcase.stage().len(), 1);
    }

    #[test]
    fn test_placeholder_never_downgrades_real() {
        let mut showcase = Showcase::new(1);
        showcase.apply(0, real("a.glb")).unwrap();
        assert_eq!(showcase.apply(0, placeholder(0)).unwrap(), SlotUpdate::Ignored);
        assert!(!showcase.displayed().unwrap().is_placeholder());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut showcase = Showcase::new(3);
        for index in 0..3 {
            showcase.apply(index, placeholder(index)).unwrap();
        }

        assert!(showcase.previous().unwrap());
        assert_eq!(showcase.current(), 2);
        assert_eq!(showcase.stage().len(), 1);
        assert!(showcase.next().unwrap());
        assert_eq!(showcase.current(), 0);
        assert!(showcase.show(1).unwrap());
        assert_eq!(showcase.stage().visible_count(), 1);
        assert!(showcase
            .stage()
            .contains(showcase.slot(1).unwrap().scene_root.id()));
    }

    #[test]
    fn test_out_of_range() {
        let mut showcase = Showcase::new(1);
        assert!(showcase.show(3).is_err());
        assert!(showcase.apply(1, placeholder(1)).is_err());
        assert!(!Showcase::new(0).next().unwrap());
    }
}
