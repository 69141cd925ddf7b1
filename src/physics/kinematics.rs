//! Kinematic state and the per-tick integrator.

use glam::Vec2;

/// Position, velocity and acceleration of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Kinematics {
    pub fn new(position: Vec2, velocity: Vec2, acceleration: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Advance `kinematics` by `dt`.
///
/// Half of the velocity is applied before the acceleration update and half
/// after, which keeps motion smooth across uneven frame times. The operation
/// order is fixed so results are reproducible bit for bit.
#[inline]
pub fn integrate(kinematics: &mut Kinematics, dt: f32) {
    kinematics.position += kinematics.velocity * dt / 2.0;
    kinematics.velocity += kinematics.acceleration * dt;
    kinematics.position += kinematics.velocity * dt / 2.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_velocity() {
        let mut k = Kinematics::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, -4.0), Vec2::ZERO);
        integrate(&mut k, 2.0);
        assert_eq!(k.position, Vec2::new(7.0, -6.0));
        assert_eq!(k.velocity, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_half_step_matches_closed_form() {
        // With constant acceleration the half-step scheme is exact:
        // x = x0 + v0*t + a*t^2/2
        let mut k = Kinematics::new(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, -10.0));
        integrate(&mut k, 0.5);
        let eps = 1e-6;
        assert!((k.position.x - 1.0).abs() < eps);
        assert!((k.position.y - -1.25).abs() < eps);
        assert!((k.velocity.y - -5.0).abs() < eps);
    }

    #[test]
    fn test_many_small_steps_track_free_fall() {
        let mut k = Kinematics::new(Vec2::new(0.0, 10.0), Vec2::ZERO, Vec2::new(0.0, -9.81));
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            integrate(&mut k, dt);
        }
        // y = 10 - 0.5 * 9.81 * 1^2
        assert!((k.position.y - 5.095).abs() < 1e-3, "y = {}", k.position.y);
        assert!(k.position.x.abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let start = Kinematics::new(Vec2::new(4.0, 4.0), Vec2::ONE, Vec2::ONE);
        let mut k = start;
        integrate(&mut k, 0.0);
        assert_eq!(k, start);
    }
}
