//! Geometric primitives used as entity hit bounds.
//!
//! Rectangles are axis-aligned and anchored at their top-left corner.
//! Circles are anchored at their centre. Lines run from `(x, y)` to `(x2, y2)`
//! and are carried for queries only; the collision engine rejects them.

pub mod factory;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

pub use factory::{AssetSizeLookup, DefaultShapeFactory, ImageMap, ImageSize, ShapeFactory};

/// Maximum distance from the segment for a point to count as on a [`Line`].
const LINE_TOLERANCE: f32 = 1e-4;

/// Discriminant of [`Shape`], used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeKind::Rect => "Rect",
            ShapeKind::Circle => "Circle",
            ShapeKind::Line => "Line",
        };
        f.write_str(name)
    }
}

/// Axis-aligned extents of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min_x, self.min_y),
            Vec2::new(self.max_x, self.min_y),
            Vec2::new(self.max_x, self.max_y),
            Vec2::new(self.min_x, self.max_y),
        ]
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x,
            min_y: self.y,
            max_x: self.x + self.width,
            max_y: self.y + self.height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point test; points on an edge are contained.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.x + rng.gen::<f32>() * self.width,
            self.y + rng.gen::<f32>() * self.height,
        )
    }
}

/// Circle anchored at its centre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x - self.radius,
            min_y: self.y - self.radius,
            max_x: self.x + self.radius,
            max_y: self.y + self.radius,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The square that circumscribes this circle.
    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            2.0 * self.radius,
            2.0 * self.radius,
        )
    }

    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Uniformly distributed over the disc area.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let angle = rng.gen::<f32>() * TAU;
        let distance = rng.gen::<f32>().sqrt() * self.radius;
        Vec2::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }
}

/// Line segment from `(x, y)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub x: f32,
    pub y: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Line {
    pub fn new(x: f32, y: f32, x2: f32, y2: f32) -> Self {
        Self { x, y, x2, y2 }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        Vec2::new(self.x2 - self.x, self.y2 - self.y).length()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x.min(self.x2),
            min_y: self.y.min(self.y2),
            max_x: self.x.max(self.x2),
            max_y: self.y.max(self.y2),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x + self.x2) / 2.0, (self.y + self.y2) / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let b = self.bounds();
        if x < b.min_x || x > b.max_x || y < b.min_y || y > b.max_y {
            return false;
        }

        let dir = Vec2::new(self.x2 - self.x, self.y2 - self.y);
        let len = dir.length();
        if len == 0.0 {
            return x == self.x && y == self.y;
        }

        // Perpendicular distance from the point to the supporting line
        let rel = Vec2::new(x - self.x, y - self.y);
        dir.perp_dot(rel).abs() / len <= LINE_TOLERANCE
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let t = rng.gen::<f32>();
        Vec2::new(
            self.x + t * (self.x2 - self.x),
            self.y + t * (self.y2 - self.y),
        )
    }
}

/// Hit-bounds primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rect(Rect::default())
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Line(_) => ShapeKind::Line,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Rect(r) => r.bounds(),
            Shape::Circle(c) => c.bounds(),
            Shape::Line(l) => l.bounds(),
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Circle(c) => c.center(),
            Shape::Line(l) => l.center(),
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            Shape::Rect(r) => r.contains(x, y),
            Shape::Circle(c) => c.contains(x, y),
            Shape::Line(l) => l.contains(x, y),
        }
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self {
            Shape::Rect(r) => r.random_point(rng),
            Shape::Circle(c) => c.random_point(rng),
            Shape::Line(l) => l.random_point(rng),
        }
    }

    /// The point that tracks the owning entity: rect top-left, circle centre,
    /// or the first endpoint of a line.
    #[inline]
    pub fn anchor(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => Vec2::new(r.x, r.y),
            Shape::Circle(c) => Vec2::new(c.x, c.y),
            Shape::Line(l) => Vec2::new(l.x, l.y),
        }
    }

    /// Moves the anchor to `anchor`. Lines keep their direction and length.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        match self {
            Shape::Rect(r) => {
                r.x = anchor.x;
                r.y = anchor.y;
            }
            Shape::Circle(c) => {
                c.x = anchor.x;
                c.y = anchor.y;
            }
            Shape::Line(l) => {
                l.x2 += anchor.x - l.x;
                l.y2 += anchor.y - l.y;
                l.x = anchor.x;
                l.y = anchor.y;
            }
        }
    }

    /// True when the shape has no usable extent: a non-positive radius,
    /// width or height, or a zero-length line.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Rect(r) => !(r.width > 0.0 && r.height > 0.0),
            Shape::Circle(c) => !(c.radius > 0.0),
            Shape::Line(l) => !(l.length() > 0.0),
        }
    }
}
