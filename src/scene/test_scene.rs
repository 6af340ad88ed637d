use glam::Vec2;
use hecs::World;

use crate::scene::prefabs::{spawn_ground, spawn_static_box, spawn_wall};

/// X of the face of the wall the demo run ends at.
pub const RIGHT_WALL_FACE: f32 = 12.0;

/// Build and populate the test level.
/// Returns the player start position, feet resting on the ground.
pub fn load_test_scene(world: &mut World) -> Vec2 {
    spawn_ground(world, 30.0);

    spawn_wall(world, RIGHT_WALL_FACE, -1.0, 8.0);
    spawn_wall(world, -RIGHT_WALL_FACE, 1.0, 8.0);

    // Low step in the middle of the glide path.
    spawn_static_box(world, Vec2::new(-6.0, 0.25), Vec2::new(1.0, 0.25));

    Vec2::new(0.0, 0.7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Aabb;

    #[test]
    fn player_starts_on_the_ground() {
        let mut world = World::new();
        let start = load_test_scene(&mut world);
        assert_eq!(world.query::<&Aabb>().iter().count(), 4);
        assert!(start.x.abs() < RIGHT_WALL_FACE);
        assert_eq!(start.y, 0.7);
    }
}
