//! Hit-shape construction from entity configuration.
//!
//! Dimensions missing from the configuration are defaulted from an external
//! asset size lookup. A failed lookup leaves them at zero; the resulting shape
//! is degenerate and gets flagged by [`EntityModel::validate`](crate::EntityModel::validate).

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;

use super::{Circle, Line, Rect, Shape};
use crate::config::EntityConfig;

/// Size of an image or sprite frame, with the transparent margins trimmed by
/// the asset packer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    pub w: f32,
    pub h: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl ImageSize {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w,
            h,
            ..Default::default()
        }
    }

    pub fn with_margins(mut self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Width including margins.
    #[inline]
    pub fn full_width(&self) -> f32 {
        self.w + self.margin_left + self.margin_right
    }

    /// Height including margins.
    #[inline]
    pub fn full_height(&self) -> f32 {
        self.h + self.margin_top + self.margin_bottom
    }
}

/// External asset size lookup.
pub trait AssetSizeLookup: Send + Sync {
    /// Size of the image registered under `image_id`.
    fn size_of(&self, image_id: &str) -> Option<ImageSize>;

    /// Size for a sprite url. Defaults to an exact lookup.
    fn size_of_url(&self, url: &str) -> Option<ImageSize> {
        self.size_of(url)
    }
}

/// In-memory [`AssetSizeLookup`] keyed by image path.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    sizes: HashMap<String, ImageSize>,
}

impl ImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image_id: impl Into<String>, size: ImageSize) {
        self.sizes.insert(image_id.into(), size);
    }

    pub fn with(mut self, image_id: impl Into<String>, size: ImageSize) -> Self {
        self.insert(image_id, size);
        self
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl AssetSizeLookup for ImageMap {
    fn size_of(&self, image_id: &str) -> Option<ImageSize> {
        self.sizes.get(image_id).copied()
    }

    /// Sprite urls name a family of frames (`"sprites/hero"` matches
    /// `"sprites/hero-run-0001.png"`); the first matching key in sorted order
    /// wins so the result does not depend on hash order.
    fn size_of_url(&self, url: &str) -> Option<ImageSize> {
        if let Some(size) = self.sizes.get(url) {
            return Some(*size);
        }
        self.sizes
            .iter()
            .filter(|(key, _)| key.contains(url))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, size)| *size)
    }
}

/// Builds hit shapes from entity configuration.
pub trait ShapeFactory: Send + Sync {
    fn shape(&self, config: &EntityConfig) -> Shape;
}

/// Default [`ShapeFactory`]: circles, lines or rectangles anchored at the
/// configured position plus offset.
#[derive(Clone, Default)]
pub struct DefaultShapeFactory {
    sizes: Option<Arc<dyn AssetSizeLookup>>,
}

impl DefaultShapeFactory {
    pub fn new(sizes: Arc<dyn AssetSizeLookup>) -> Self {
        Self { sizes: Some(sizes) }
    }

    fn lookup(&self, config: &EntityConfig) -> Option<ImageSize> {
        let sizes = self.sizes.as_ref()?;
        let size = match (&config.image, &config.url) {
            (Some(image), _) => sizes.size_of(image),
            (None, Some(url)) => sizes.size_of_url(url),
            (None, None) => None,
        }?;
        (size.full_width() > 0.0 && size.full_height() > 0.0).then_some(size)
    }

    /// Width and height for `config`, filling gaps from the image size.
    ///
    /// A single explicit dimension scales the other one to keep the image's
    /// aspect ratio.
    pub fn hit_dimensions(&self, config: &EntityConfig) -> (f32, f32) {
        if let (Some(width), Some(height)) = (config.width, config.height) {
            return (width, height);
        }

        let Some(size) = self.lookup(config) else {
            return (config.width.unwrap_or(0.0), config.height.unwrap_or(0.0));
        };

        let (img_w, img_h) = (size.full_width(), size.full_height());
        match (config.width, config.height) {
            (Some(width), _) => (width, width / img_w * img_h),
            (None, Some(height)) => (height / img_h * img_w, height),
            (None, None) => (img_w, img_h),
        }
    }
}

impl ShapeFactory for DefaultShapeFactory {
    fn shape(&self, config: &EntityConfig) -> Shape {
        let origin = Vec2::new(config.x + config.offset_x, config.y + config.offset_y);

        if config.is_circle() {
            let radius = match config.radius {
                Some(radius) if radius > 0.0 => radius,
                explicit => {
                    let (width, height) = self.hit_dimensions(config);
                    if width > 0.0 || height > 0.0 {
                        (width + height) / 4.0
                    } else {
                        explicit.unwrap_or(0.0)
                    }
                }
            };
            return Shape::Circle(Circle::new(origin.x, origin.y, radius));
        }

        if let (Some(x2), Some(y2)) = (config.x2, config.y2) {
            let end = origin + Vec2::new(x2 - config.x, y2 - config.y);
            return Shape::Line(Line::new(origin.x, origin.y, end.x, end.y));
        }

        let (width, height) = self.hit_dimensions(config);
        Shape::Rect(Rect::new(origin.x, origin.y, width, height))
    }
}
