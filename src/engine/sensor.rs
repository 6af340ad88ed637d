use glam::Vec2;

use crate::components::Facing;

/// Surface contact queries answered by the scene.
pub trait SurfaceSensor {
    fn is_grounded(&self, position: Vec2) -> bool;

    /// Distance from the chest ray's origin to a wall on the `facing` side,
    /// if one is within reach. The controller moves the body by this much on
    /// first contact so a stall starts flush against the wall.
    fn wall_gap(&self, position: Vec2, facing: Facing) -> Option<f32>;

    fn is_against_wall(&self, position: Vec2, facing: Facing) -> bool {
        self.wall_gap(position, facing).is_some()
    }
}

/// Sensor with fixed answers, for driving a controller without a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedContacts {
    pub grounded: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl FixedContacts {
    pub fn grounded() -> Self {
        Self { grounded: true, ..Self::default() }
    }

    pub fn airborne() -> Self {
        Self::default()
    }

    pub fn wall(facing: Facing) -> Self {
        match facing {
            Facing::Left => Self { wall_left: true, ..Self::default() },
            Facing::Right => Self { wall_right: true, ..Self::default() },
        }
    }
}

impl SurfaceSensor for FixedContacts {
    fn is_grounded(&self, _position: Vec2) -> bool {
        self.grounded
    }

    /// Walls are always already flush.
    fn wall_gap(&self, _position: Vec2, facing: Facing) -> Option<f32> {
        let touching = match facing {
            Facing::Left => self.wall_left,
            Facing::Right => self.wall_right,
        };
        touching.then_some(0.0)
    }
}
