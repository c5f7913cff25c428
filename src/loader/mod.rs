//! Loader module for binary container handling
//!
//! Contains the GLB container reader and writer.

pub mod glb;

// Re-export common types
pub use glb::*;
