//! The view role of an entity.
//!
//! Rendering lives outside this crate. A view only ever reads the model; the
//! physics side never calls into it.

use super::model::EntityModel;
use crate::config::EntityConfig;

/// Render-side companion of an [`EntityModel`].
pub trait View {
    /// Called after the model has been reset for a new lifetime.
    fn reset(&mut self, model: &EntityModel, config: &EntityConfig);

    /// Called after the model has been updated each tick.
    fn update(&mut self, model: &EntityModel, dt: f32);

    /// Called when the owning entity is released back to its pool.
    fn hide(&mut self) {}

    /// Debug overlay of the model's hit shape.
    fn show_hit_bounds(&mut self, _model: &EntityModel) {}

    fn hide_hit_bounds(&mut self) {}
}

/// View for entities that are never drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoView;

impl View for NoView {
    fn reset(&mut self, _model: &EntityModel, _config: &EntityConfig) {}

    fn update(&mut self, _model: &EntityModel, _dt: f32) {}
}
