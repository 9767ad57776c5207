//! Spine texture atlas parser and skeleton setup-pose data model (unofficial).
//!
//! This crate holds no rendering or animation math. Texture loading and animation playback are
//! reached through the [`TextureLoader`] and [`AnimationPlayer`] traits.

#![forbid(unsafe_code)]

mod atlas;
mod error;
mod model;
mod names;
mod playback;
mod skeleton_data;
mod transform_constraint;
mod version;

pub use atlas::*;
pub use error::*;
pub use model::*;
pub use names::Named;
pub use playback::*;
pub use skeleton_data::*;
pub use transform_constraint::*;
pub use version::*;


#[cfg(test)]
mod skeleton_data_tests;
