//! Scene builders shared by the criterion benches.

use entities2d::{Circle, EntityConfig, EntityPool, EntityRef, PoolConfig, Rect, Shape};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Side length of the square area holding `n` entities at roughly constant
/// density.
pub fn area_for(n: usize) -> f32 {
    (n as f32).sqrt() * 40.0
}

/// `n` configs scattered over [`area_for`]`(n)`, half rects and half circles.
pub fn scattered_configs(n: usize, seed: u64) -> Vec<EntityConfig> {
    let mut rng = StdRng::seed_from_u64(seed);
    let side = area_for(n);
    (0..n)
        .map(|i| {
            let position = Vec2::new(rng.gen_range(0.0..side), rng.gen_range(0.0..side));
            let velocity = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
                * rng.gen_range(0.0f32..50.0);
            let config =
                EntityConfig::at(position.x, position.y).with_velocity(velocity.x, velocity.y);
            if i % 2 == 0 {
                config.with_size(rng.gen_range(8.0..24.0), rng.gen_range(8.0..24.0))
            } else {
                config.with_radius(rng.gen_range(4.0..12.0))
            }
        })
        .collect()
}

/// A pool with `n` active entities from [`scattered_configs`].
pub fn setup_pool(name: &str, n: usize, seed: u64) -> (EntityPool, Vec<EntityRef>) {
    let mut pool = EntityPool::new(PoolConfig::named(name).with_init_count(n));
    let handles = scattered_configs(n, seed)
        .iter()
        .map(|config| pool.obtain(config).handle())
        .collect();
    (pool, handles)
}

/// Shape pairs for the pairwise functions: `(name, a, b)`.
pub fn shape_pairs() -> Vec<(&'static str, Shape, Shape)> {
    vec![
        (
            "circle_circle/hit",
            Shape::Circle(Circle::new(0.0, 0.0, 5.0)),
            Shape::Circle(Circle::new(6.0, 0.0, 5.0)),
        ),
        (
            "circle_circle/miss",
            Shape::Circle(Circle::new(0.0, 0.0, 5.0)),
            Shape::Circle(Circle::new(20.0, 0.0, 5.0)),
        ),
        (
            "circle_rect/side",
            Shape::Circle(Circle::new(-3.0, 5.0, 5.0)),
            Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ),
        (
            "circle_rect/corner",
            Shape::Circle(Circle::new(-2.0, -2.0, 5.0)),
            Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ),
        (
            "rect_rect/hit",
            Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Shape::Rect(Rect::new(8.0, 0.0, 10.0, 10.0)),
        ),
        (
            "rect_rect/miss",
            Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Shape::Rect(Rect::new(30.0, 0.0, 10.0, 10.0)),
        ),
    ]
}

/// Resolve every collision between `movers` and `fixed`, the way a game
/// tick would. Returns the number of pairs resolved.
pub fn resolve_all(movers: &mut EntityPool, fixed: &mut EntityPool) -> anyhow::Result<usize> {
    let mut pairs = Vec::new();
    movers.on_all_pool_collisions(fixed, |_, a, _, b| pairs.push((a, b)))?;
    for &(a, b) in &pairs {
        if let (Some(a), Some(b)) = (movers.get_mut(a), fixed.get_mut(b)) {
            a.resolve_collision_with(b)?;
        }
    }
    Ok(pairs.len())
}
