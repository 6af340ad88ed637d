use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Aabb, Environment, Static};

// ---------------------------------------------------------------------------
// Public prefab factories
// ---------------------------------------------------------------------------

/// Spawn the ground as a thick box whose top face sits at Y=0.
pub fn spawn_ground(world: &mut World, half_width: f32) -> Entity {
    const THICKNESS: f32 = 1.0;
    spawn_static_box(
        world,
        Vec2::new(0.0, -THICKNESS / 2.0),
        Vec2::new(half_width, THICKNESS / 2.0),
    )
}

/// Spawn a wall standing on the ground. `face_x` is the X of the face the
/// player can stall against; `toward` is the side that face looks at
/// (negative: the wall is to the player's right).
pub fn spawn_wall(world: &mut World, face_x: f32, toward: f32, height: f32) -> Entity {
    const HALF_THICKNESS: f32 = 0.5;
    let center_x = face_x - toward.signum() * HALF_THICKNESS;
    spawn_static_box(
        world,
        Vec2::new(center_x, height / 2.0),
        Vec2::new(HALF_THICKNESS, height / 2.0),
    )
}

/// Spawn a static box that both blocks the body and is hit by the sensor
/// rays. `pos` is the world-space center.
pub fn spawn_static_box(world: &mut World, pos: Vec2, half_extents: Vec2) -> Entity {
    world.spawn((Aabb::new(pos, half_extents), Static, Environment))
}
