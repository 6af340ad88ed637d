use glam::Vec2;
use hecs::World;

use crate::components::{Aabb, Environment, Facing, Static};
use crate::config::SensingTuning;
use crate::engine::sensor::SurfaceSensor;

/// Cast a ray against all `Environment` geometry, returning the nearest hit
/// distance within `max_distance`.
pub fn raycast_environment(
    world: &World,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<f32> {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    let mut best: Option<f32> = None;

    for (_, aabb) in world
        .query::<&Aabb>()
        .with::<(&Static, &Environment)>()
        .iter()
    {
        if let Some(t) = ray_aabb_intersection(origin, dir, aabb) {
            if t <= max_distance && best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    }

    best
}

/// Slab test. A ray starting inside the box hits at distance 0.
fn ray_aabb_intersection(origin: Vec2, dir: Vec2, aabb: &Aabb) -> Option<f32> {
    let min = aabb.min();
    let max = aabb.max();
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..2 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: either always inside it or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t1 = (min[axis] - o) * inv;
        let t2 = (max[axis] - o) * inv;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Ankle and chest ray probes against the level.
///
/// The ankle ray points straight down from just above the body's feet; the
/// chest ray points sideways from just inside the body toward the facing
/// direction.
pub struct WorldProbe<'w> {
    world: &'w World,
    sensing: SensingTuning,
}

impl<'w> WorldProbe<'w> {
    pub fn new(world: &'w World, sensing: &SensingTuning) -> Self {
        Self {
            world,
            sensing: sensing.clone(),
        }
    }
}

impl SurfaceSensor for WorldProbe<'_> {
    fn is_grounded(&self, position: Vec2) -> bool {
        let ankles = position - Vec2::new(0.0, self.sensing.ankles_ray_offset);
        raycast_environment(self.world, ankles, Vec2::NEG_Y, self.sensing.ankles_ray_length)
            .is_some()
    }

    fn wall_gap(&self, position: Vec2, facing: Facing) -> Option<f32> {
        let side = facing.sign();
        let chest = position + Vec2::new(self.sensing.chest_ray_offset * side, 0.0);
        raycast_environment(
            self.world,
            chest,
            Vec2::new(side, 0.0),
            self.sensing.chest_ray_length,
        )
    }
}
