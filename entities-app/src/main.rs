//! Headless sandbox: balls fall onto fixed walls while bullets sweep across
//! and knock them out. Run with `RUST_LOG=debug` to see pool activity.

use anyhow::Context;
use entities2d::{
    EntityConfig, EntityId, EntityModel, EntityPool, EntityRef, NoView, PoolConfig, View,
};
use glam::Vec2;

const ARENA_WIDTH: f32 = 400.0;
const ARENA_HEIGHT: f32 = 300.0;
const GRAVITY: f32 = 400.0;
const BOUNCE: f32 = 0.5;

/// Game loop configuration.
struct GameLoopConfig {
    /// Fixed timestep for physics (seconds). Default: 1/60.
    fixed_timestep: f64,
    /// Maximum physics substeps per frame. Default: 4.
    max_substeps: u32,
    /// Simulated frames to run.
    frames: u32,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            frames: 600,
        }
    }
}

/// Tracks how far a ball travelled between spawn and release.
#[derive(Default)]
struct TrailView {
    uid: Option<EntityId>,
    spawn: Vec2,
    last: Vec2,
}

impl View for TrailView {
    fn reset(&mut self, model: &EntityModel, _config: &EntityConfig) {
        self.uid = Some(model.uid());
        self.spawn = model.position();
        self.last = model.position();
    }

    fn update(&mut self, model: &EntityModel, _dt: f32) {
        self.last = model.position();
    }

    fn hide(&mut self) {
        if let Some(uid) = self.uid {
            log::debug!(
                "ball {} travelled {:.1} before release",
                uid,
                self.spawn.distance(self.last)
            );
        }
    }
}

struct Sandbox {
    walls: EntityPool<NoView>,
    balls: EntityPool<TrailView>,
    bullets: EntityPool<NoView>,
    step: u32,
    knocked_out: usize,
    bounces: usize,
}

impl Sandbox {
    fn new() -> Self {
        let mut walls = EntityPool::new(PoolConfig::named("walls").with_init_count(3));
        let floor = EntityConfig::at(0.0, ARENA_HEIGHT - 20.0)
            .with_size(ARENA_WIDTH, 20.0)
            .fixed();
        let left = EntityConfig::at(-20.0, 0.0)
            .with_size(20.0, ARENA_HEIGHT)
            .fixed();
        let right = EntityConfig::at(ARENA_WIDTH, 0.0)
            .with_size(20.0, ARENA_HEIGHT)
            .fixed();
        for config in [floor, left, right] {
            walls.obtain(&config);
        }

        Self {
            walls,
            balls: EntityPool::with_views(PoolConfig::named("balls").with_init_count(16), |_| {
                TrailView::default()
            }),
            bullets: EntityPool::new(PoolConfig::named("bullets").with_init_count(8)),
            step: 0,
            knocked_out: 0,
            bounces: 0,
        }
    }

    fn spawn(&mut self) {
        if self.step % 20 == 0 {
            let lane = (self.step / 20) % 8;
            let x = 30.0 + lane as f32 * 45.0;
            let vx = if lane % 2 == 0 { 40.0 } else { -40.0 };
            self.balls.obtain(
                &EntityConfig::at(x, 10.0)
                    .with_radius(8.0)
                    .with_velocity(vx, 0.0)
                    .with_acceleration(0.0, GRAVITY),
            );
        }
        if self.step % 45 == 0 {
            let y = ARENA_HEIGHT - 40.0 - (self.step % 90) as f32;
            self.bullets.obtain(
                &EntityConfig::at(0.0, y)
                    .with_size(6.0, 2.0)
                    .with_velocity(300.0, 0.0),
            );
        }
    }

    fn fixed_update(&mut self, dt: f32) -> anyhow::Result<()> {
        self.spawn();
        self.step += 1;

        self.walls.update(dt);
        self.balls.update(dt);
        self.bullets.update(dt);

        // Bullets that leave the arena go back to the pool
        let mut failures = Vec::new();
        self.bullets.for_each_active_entity(|bullets, handle| {
            let gone = bullets
                .get(handle)
                .is_some_and(|bullet| bullet.model().min_x() > ARENA_WIDTH);
            if gone {
                failures.extend(bullets.release(handle).err());
            }
        });
        if let Some(err) = failures.pop() {
            return Err(err).context("releasing a bullet that left the arena");
        }

        // Bullets knock balls out, and are spent on the first hit
        self.knocked_out += self.bullets.on_all_pool_collisions(
            &mut self.balls,
            |bullets, bullet, balls, ball| {
                failures.extend(bullets.release(bullet).err());
                failures.extend(balls.release(ball).err());
            },
        )?;
        if let Some(err) = failures.pop() {
            return Err(err).context("releasing a bullet and the ball it hit");
        }

        // Balls rest on the walls
        let mut contacts: Vec<(EntityRef, EntityRef)> = Vec::new();
        self.balls
            .on_all_pool_collisions(&mut self.walls, |_, ball, _, wall| {
                contacts.push((ball, wall))
            })?;
        for (ball, wall) in contacts {
            self.bounce(ball, wall)?;
        }
        Ok(())
    }

    fn bounce(&mut self, ball: EntityRef, wall: EntityRef) -> anyhow::Result<()> {
        let (Some(ball), Some(wall)) = (self.balls.get_mut(ball), self.walls.get_mut(wall)) else {
            return Ok(());
        };
        let before = ball.model().position();
        let moved = ball.resolve_collision_with(wall).with_context(|| {
            format!("resolving ball {} against wall {}", ball.uid(), wall.uid())
        })?;
        if moved <= 0.0 {
            return Ok(());
        }

        let push = ball.model().position() - before;
        let mut velocity = ball.model().velocity();
        if push.y.abs() > push.x.abs() {
            velocity.y = -velocity.y * BOUNCE;
        } else {
            velocity.x = -velocity.x;
        }
        ball.model_mut().set_velocity(velocity);
        self.bounces += 1;
        Ok(())
    }
}

fn run(config: GameLoopConfig, sandbox: &mut Sandbox) -> anyhow::Result<()> {
    let mut accumulator = 0.0f64;
    for frame in 0..config.frames {
        // Uneven frame times, as from a real display
        let delta_time = if frame % 2 == 0 { 1.0 / 50.0 } else { 1.0 / 70.0 };

        accumulator += delta_time;
        let mut substeps = 0u32;
        while accumulator >= config.fixed_timestep && substeps < config.max_substeps {
            sandbox.fixed_update(config.fixed_timestep as f32)?;
            accumulator -= config.fixed_timestep;
            substeps += 1;
        }

        if frame % 120 == 0 {
            log::info!(
                "frame {}: {} balls ({} allocated), {} bullets ({} allocated)",
                frame,
                sandbox.balls.active_count(),
                sandbox.balls.total_count(),
                sandbox.bullets.active_count(),
                sandbox.bullets.total_count()
            );
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut sandbox = Sandbox::new();
    run(GameLoopConfig::default(), &mut sandbox)?;

    log::info!(
        "done after {} steps: {} balls knocked out, {} wall contacts resolved",
        sandbox.step,
        sandbox.knocked_out,
        sandbox.bounces
    );
    sandbox.balls.release_all();
    sandbox.bullets.release_all();
    sandbox.walls.release_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_releases_cleanly() {
        let mut sandbox = Sandbox::new();
        let config = GameLoopConfig {
            frames: 300,
            ..Default::default()
        };
        run(config, &mut sandbox).unwrap();

        assert!(sandbox.step > 250);
        // Bullets leave the arena long before the prewarmed slots run out
        assert_eq!(sandbox.bullets.total_count(), 8);
        assert!(sandbox.bullets.active_count() <= 2);
        assert!(sandbox.balls.active_count() <= sandbox.balls.total_count());
    }
}
