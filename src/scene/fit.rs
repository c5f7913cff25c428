//! Fit-to-view normalization
//!
//! Centres a freshly loaded model on its bounding box and rescales it so
//! downstream presentation code can assume a known on-screen size.

use super::{Aabb, NodeKind, SceneNode};
use crate::error::{AssetError, Result};
use glam::Vec3;

/// How the model's largest extent is mapped to the target size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitPolicy {
    /// Always scale so the largest extent equals `target`
    Exact { target: f32 },
    /// Shrink models larger than `target`; grow models smaller than half of
    /// `target` to 70% of it; leave the rest alone
    Clamp { target: f32 },
}

impl FitPolicy {
    /// Target size of the largest extent
    pub fn target(&self) -> f32 {
        match *self {
            Self::Exact { target } | Self::Clamp { target } => target,
        }
    }

    /// Reject targets that would collapse or corrupt a fitted model
    pub fn validate(&self) -> Result<()> {
        let target = self.target();
        if target.is_finite() && target > 0.0 {
            Ok(())
        } else {
            Err(AssetError::InvalidArgument(format!(
                "fit target must be positive and finite, got {target}"
            )))
        }
    }

    /// Uniform scale factor for a model whose largest extent is `max_extent`
    ///
    /// Returns 1.0 for degenerate extents.
    pub fn scale_for(&self, max_extent: f32) -> f32 {
        if !max_extent.is_finite() || max_extent <= f32::EPSILON {
            return 1.0;
        }
        match *self {
            Self::Exact { target } => target / max_extent,
            Self::Clamp { target } => {
                if max_extent > target {
                    target / max_extent
                } else if max_extent < target * 0.5 {
                    target * 0.7 / max_extent
                } else {
                    1.0
                }
            }
        }
    }
}

/// Post-load property setup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub policy: FitPolicy,
    /// Vertical offset applied after centring
    pub lift: f32,
    /// Hide the root so a carousel can reveal it later
    pub start_hidden: bool,
    /// Turn on shadow casting and receiving for every mesh
    pub enable_shadows: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::viewer()
    }
}

impl FitOptions {
    /// Carousel viewers: clamp to 3 units, lift slightly, start hidden
    pub fn viewer() -> Self {
        Self {
            policy: FitPolicy::Clamp { target: 3.0 },
            lift: 0.1,
            start_hidden: true,
            enable_shadows: true,
        }
    }

    /// Single scroll-animated model: exactly 2 units, visible immediately
    pub fn coin() -> Self {
        Self {
            policy: FitPolicy::Exact { target: 2.0 },
            lift: 0.0,
            start_hidden: false,
            enable_shadows: false,
        }
    }

    /// Set the scaling policy
    pub fn with_policy(mut self, policy: FitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the vertical offset applied after centring
    pub fn with_lift(mut self, lift: f32) -> Self {
        self.lift = lift;
        self
    }

    /// Set whether the root starts hidden
    pub fn with_start_hidden(mut self, start_hidden: bool) -> Self {
        self.start_hidden = start_hidden;
        self
    }

    /// Check the policy target and the lift
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        if !self.lift.is_finite() {
            return Err(AssetError::InvalidArgument(format!(
                "fit lift must be finite, got {}",
                self.lift
            )));
        }
        Ok(())
    }
}

/// Centre, scale and flag `node` in place
///
/// Returns the bounds after fitting, or `None` when the subtree carries no
/// geometry (its transform is then left untouched).
pub fn fit_to_view(node: &mut SceneNode, options: &FitOptions) -> Option<Aabb> {
    if options.enable_shadows {
        node.traverse_mut(&mut |n| {
            if let NodeKind::Mesh(mesh) = &mut n.kind {
                mesh.cast_shadow = true;
                mesh.receive_shadow = true;
            }
        });
    }
    if options.start_hidden {
        node.visible = false;
    }

    let bounds = node.bounding_box()?;
    let max_extent = bounds.max_extent();
    if bounds.is_degenerate() {
        log::debug!("Fitting flat model with extents {:?}", bounds.size());
    }
    let scale = options.policy.scale_for(max_extent);
    let center = bounds.center();

    // p' = scale * (p - center) + lift, folded into the root transform
    let transform = &mut node.transform;
    let translation = Vec3::from(transform.translation) * scale - center * scale
        + Vec3::new(0.0, options.lift, 0.0);
    transform.translation = translation.to_array();
    transform.scale = (Vec3::from(transform.scale) * scale).to_array();

    node.bounding_box()
}
