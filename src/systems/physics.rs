use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Aabb, Body2D, Static};

/// Contact produced while pushing the body out of static geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity: Entity,
    /// Points from the geometry toward the body.
    pub normal: Vec2,
    pub penetration_depth: f32,
}

/// One fixed step for the character body: integrate, then resolve overlaps
/// against every `Static` box along the axis of least penetration. Velocity
/// into a contact surface is removed.
pub fn physics_step(world: &World, body: &mut Body2D, gravity: Vec2, dt: f32) -> Vec<CollisionEvent> {
    body.integrate(gravity, dt);

    let mut events = Vec::new();
    for (entity, aabb) in world.query::<&Aabb>().with::<&Static>().iter() {
        let delta = body.position - aabb.center;
        let overlap = body.half_extents + aabb.half_extents - delta.abs();
        if overlap.x <= 0.0 || overlap.y <= 0.0 {
            continue;
        }

        let (normal, depth) = if overlap.x < overlap.y {
            (Vec2::new(delta.x.signum(), 0.0), overlap.x)
        } else {
            (Vec2::new(0.0, delta.y.signum()), overlap.y)
        };

        body.position += normal * depth;
        let into_surface = body.velocity.dot(normal);
        if into_surface < 0.0 {
            body.velocity -= normal * into_surface;
        }

        events.push(CollisionEvent {
            entity,
            normal,
            penetration_depth: depth,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Environment;

    #[test]
    fn body_comes_to_rest_on_the_floor() {
        let mut world = World::new();
        world.spawn((Aabb::new(Vec2::new(0.0, -0.5), Vec2::new(10.0, 0.5)), Static, Environment));
        let mut body = Body2D::new(Vec2::new(0.0, 2.0));

        let mut touched = false;
        for _ in 0..200 {
            touched |= !physics_step(&world, &mut body, Vec2::new(0.0, -9.81), 0.02).is_empty();
        }
        assert!(touched);
        assert!((body.position.y - body.half_extents.y).abs() < 1e-3);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn wall_stops_horizontal_motion_only() {
        let mut world = World::new();
        world.spawn((Aabb::new(Vec2::new(1.5, 0.0), Vec2::new(0.5, 5.0)), Static));
        let mut body = Body2D::new(Vec2::new(0.74, 0.0));
        body.velocity = Vec2::new(3.0, 1.0);

        let events = physics_step(&world, &mut body, Vec2::ZERO, 0.02);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].normal, Vec2::NEG_X);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.y, 1.0);
        assert!((body.position.x - 0.75).abs() < 1e-5);
    }
}
