//! Collision detection and response for axis-aligned boxes
//!
//! Moving bodies are resolved against immovable boxes (platforms) and the
//! world rectangle. The approach side comes from where the body was before
//! the step, which keeps a falling body from being shoved sideways when it
//! lands near a platform edge.

use glam::Vec2;

use super::body::{Aabb, Body};

/// Tolerance when comparing previous edges against a fixed box
const EDGE_EPSILON: f32 = 0.001;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Direction to push the moving body (unit axis vector)
    pub normal: Vec2,
    /// Penetration depth along the normal (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// Check a moving box against an immovable one
///
/// `previous` is the moving box one step earlier. If it was already clear of
/// `fixed` on some side, the body is pushed back out through that side;
/// otherwise (spawned overlapping) the shallowest axis wins.
pub fn aabb_static_collision(current: &Aabb, previous: &Aabb, fixed: &Aabb) -> CollisionResult {
    if !current.overlaps(fixed) {
        return CollisionResult::miss();
    }

    let push_up = current.max.y - fixed.min.y;
    let push_down = fixed.max.y - current.min.y;
    let push_left = current.max.x - fixed.min.x;
    let push_right = fixed.max.x - current.min.x;

    if previous.max.y <= fixed.min.y + EDGE_EPSILON {
        return CollisionResult::hit(Vec2::NEG_Y, push_up);
    }
    if previous.min.y >= fixed.max.y - EDGE_EPSILON {
        return CollisionResult::hit(Vec2::Y, push_down);
    }
    if previous.max.x <= fixed.min.x + EDGE_EPSILON {
        return CollisionResult::hit(Vec2::NEG_X, push_left);
    }
    if previous.min.x >= fixed.max.x - EDGE_EPSILON {
        return CollisionResult::hit(Vec2::X, push_right);
    }

    // Already overlapping last step
    [
        (Vec2::NEG_Y, push_up),
        (Vec2::Y, push_down),
        (Vec2::NEG_X, push_left),
        (Vec2::X, push_right),
    ]
    .into_iter()
    .min_by(|a, b| a.1.total_cmp(&b.1))
    .map(|(normal, penetration)| CollisionResult::hit(normal, penetration))
    .unwrap_or_else(CollisionResult::miss)
}

/// Push a body out of an immovable box and apply its bounce
///
/// Returns true if the body was touching the box.
pub fn separate(body: &mut Body, fixed: &Aabb) -> bool {
    let result = aabb_static_collision(&body.aabb(), &body.prev_aabb(), fixed);
    if !result.hit {
        return false;
    }

    body.pos += result.normal * result.penetration;
    let restitution = if result.normal.x != 0.0 {
        body.bounce.x
    } else {
        body.bounce.y
    };
    body.vel = reflect_velocity(body.vel, result.normal, restitution);
    mark_touching(body, result.normal);
    true
}

/// Keep a body inside the world rectangle
///
/// The bottom edge counts as ground contact.
pub fn world_bounds_collision(body: &mut Body, bounds: &Aabb) -> bool {
    let aabb = body.aabb();
    let mut hit = false;

    if aabb.min.x < bounds.min.x {
        body.pos.x += bounds.min.x - aabb.min.x;
        body.vel = reflect_velocity(body.vel, Vec2::X, body.bounce.x);
        mark_touching(body, Vec2::X);
        hit = true;
    } else if aabb.max.x > bounds.max.x {
        body.pos.x -= aabb.max.x - bounds.max.x;
        body.vel = reflect_velocity(body.vel, Vec2::NEG_X, body.bounce.x);
        mark_touching(body, Vec2::NEG_X);
        hit = true;
    }

    if aabb.min.y < bounds.min.y {
        body.pos.y += bounds.min.y - aabb.min.y;
        body.vel = reflect_velocity(body.vel, Vec2::Y, body.bounce.y);
        mark_touching(body, Vec2::Y);
        hit = true;
    } else if aabb.max.y > bounds.max.y {
        body.pos.y -= aabb.max.y - bounds.max.y;
        body.vel = reflect_velocity(body.vel, Vec2::NEG_Y, body.bounce.y);
        mark_touching(body, Vec2::NEG_Y);
        hit = true;
    }

    hit
}

/// Reflect the approaching part of a velocity off a surface
///
/// v' = v - (1 + e)(v·n)n, applied only when moving into the surface.
/// `restitution` 1 is a perfect mirror, 0 kills the normal component.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}

fn mark_touching(body: &mut Body, normal: Vec2) {
    if normal.y < 0.0 {
        body.touching.down = true;
    } else if normal.y > 0.0 {
        body.touching.up = true;
    } else if normal.x < 0.0 {
        body.touching.right = true;
    } else if normal.x > 0.0 {
        body.touching.left = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Aabb {
        Aabb::new(Vec2::new(0.0, 536.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_landing_pushes_up_and_sets_ground_contact() {
        let mut body = Body::dynamic(Vec2::new(100.0, 510.0), Vec2::new(0.32, 0.48))
            .with_bounce(Vec2::splat(0.2));
        body.vel = Vec2::new(0.0, 120.0);
        body.integrate(0.0, 1.0 / 60.0);
        body.pos.y = 515.0; // bottom at 539, 3 units into the ground

        assert!(separate(&mut body, &ground()));
        assert!((body.aabb().max.y - 536.0).abs() < 0.001);
        assert!(body.touching.down);
        // Bounce 0.2 reflects a fifth of the fall speed
        assert!((body.vel.y + 24.0).abs() < 0.001);
    }

    #[test]
    fn test_side_hit_uses_previous_position() {
        let fixed = Aabb::new(Vec2::new(500.0, 390.0), Vec2::new(700.0, 410.0));
        let previous = Aabb::from_center(Vec2::new(480.0, 400.0), Vec2::splat(32.0));
        let current = Aabb::from_center(Vec2::new(486.0, 400.0), Vec2::splat(32.0));

        let result = aabb_static_collision(&current, &previous, &fixed);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_spawn_overlap_resolves_along_shallow_axis() {
        // Enemy spawned at (700, 200) sits 6 units into the (750, 220) platform
        let fixed = Aabb::from_center(Vec2::new(750.0, 220.0), Vec2::new(100.0, 20.0));
        let enemy = Aabb::from_center(Vec2::new(700.0, 200.0), Vec2::splat(32.0));

        let result = aabb_static_collision(&enemy, &enemy, &fixed);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_velocity() {
        // Perfectly elastic
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::NEG_X, 1.0);
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);

        // Moving away from the surface is left alone
        let away = reflect_velocity(Vec2::new(-100.0, 5.0), Vec2::NEG_X, 1.0);
        assert_eq!(away, Vec2::new(-100.0, 5.0));

        // Zero bounce stops the normal component
        let stopped = reflect_velocity(Vec2::new(30.0, 200.0), Vec2::NEG_Y, 0.0);
        assert_eq!(stopped, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_world_bounds_clamp() {
        let bounds = Aabb::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let mut enemy = Body::dynamic(Vec2::new(790.0, 300.0), Vec2::splat(0.32))
            .with_bounce(Vec2::ONE)
            .with_world_bounds();
        enemy.vel = Vec2::new(150.0, 0.0);

        assert!(world_bounds_collision(&mut enemy, &bounds));
        assert!((enemy.aabb().max.x - 800.0).abs() < 0.001);
        assert!((enemy.vel.x + 150.0).abs() < 0.001);
        assert!(enemy.touching.right);

        // Inside: untouched
        let mut player = Body::dynamic(Vec2::new(100.0, 300.0), Vec2::splat(0.32));
        assert!(!world_bounds_collision(&mut player, &bounds));
    }
}
