mod physics;
mod player;
mod raycast;

pub use physics::{physics_step, CollisionEvent};
pub use player::build_player_fsm;
pub use raycast::{raycast_environment, WorldProbe};
