mod character;
mod physics;

pub use character::{
    BrakeLatch, Character, Contacts, Facing, JumpTracker, MoveState, PlayerFsm,
};
pub use physics::{Aabb, Body2D, Environment, PhysicsBody, Static};
