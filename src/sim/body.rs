//! Arcade-style bodies
//!
//! Every entity is an axis-aligned box sized as a scale of the base sprite.
//! Positions are box centers in world units (top-left origin, +y down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BASE_SPRITE_SIZE;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point test (used for touch zones)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Which sides of a body touched something during the last physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// A physics body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub pos: Vec2,
    /// Center position before the last integration (drives approach-side detection)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Fraction of velocity kept on each axis after a collision
    pub bounce: Vec2,
    /// Clamp to the world rectangle
    pub collide_world_bounds: bool,
    /// Static bodies never move and ignore gravity
    pub immovable: bool,
    pub allow_gravity: bool,
    /// Disabled bodies are skipped by physics and rendering
    pub enabled: bool,
    pub touching: Touching,
}

impl Body {
    fn with_scale(pos: Vec2, scale: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(BASE_SPRITE_SIZE) * scale,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
            immovable: false,
            allow_gravity: true,
            enabled: true,
            touching: Touching::default(),
        }
    }

    /// Gravity-affected body sized as `scale` of the base sprite
    pub fn dynamic(pos: Vec2, scale: Vec2) -> Self {
        Self::with_scale(pos, scale)
    }

    /// Immovable collision target
    pub fn fixed(pos: Vec2, scale: Vec2) -> Self {
        Self {
            immovable: true,
            allow_gravity: false,
            ..Self::with_scale(pos, scale)
        }
    }

    pub fn with_bounce(mut self, bounce: Vec2) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn prev_aabb(&self) -> Aabb {
        Aabb::from_center(self.prev_pos, self.size)
    }

    /// Whether the body is resting on something (last step)
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.touching.down
    }

    /// Advance one step: gravity, then position (semi-implicit Euler)
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        if !self.enabled || self.immovable {
            return;
        }
        self.prev_pos = self.pos;
        self.touching = Touching::default();
        if self.allow_gravity {
            self.vel.y += gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Remove the body from the simulation
    pub fn disable(&mut self) {
        self.enabled = false;
        self.vel = Vec2::ZERO;
        self.touching = Touching::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_from_scale() {
        let body = Body::dynamic(Vec2::new(100.0, 450.0), Vec2::new(0.32, 0.48));
        assert!((body.size.x - 32.0).abs() < 0.001);
        assert!((body.size.y - 48.0).abs() < 0.001);

        let aabb = body.aabb();
        assert!((aabb.min.x - 84.0).abs() < 0.001);
        assert!((aabb.max.y - 474.0).abs() < 0.001);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let inside = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(a.contains_point(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_integrate_applies_gravity() {
        let mut body = Body::dynamic(Vec2::ZERO, Vec2::ONE);
        body.integrate(300.0, 0.5);
        assert!((body.vel.y - 150.0).abs() < 0.001);
        assert!((body.pos.y - 75.0).abs() < 0.001);
        assert_eq!(body.prev_pos, Vec2::ZERO);
    }

    #[test]
    fn test_fixed_and_disabled_bodies_do_not_move() {
        let mut platform = Body::fixed(Vec2::new(400.0, 568.0), Vec2::new(8.0, 0.64));
        platform.integrate(300.0, 1.0);
        assert_eq!(platform.pos, Vec2::new(400.0, 568.0));

        let mut coin = Body::dynamic(Vec2::new(12.0, 0.0), Vec2::splat(0.2)).with_velocity(Vec2::X);
        coin.disable();
        coin.integrate(300.0, 1.0);
        assert_eq!(coin.pos, Vec2::new(12.0, 0.0));
        assert_eq!(coin.vel, Vec2::ZERO);
    }
}
