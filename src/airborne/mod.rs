//! Pluggable behaviour for the Airborne state.
//!
//! Exactly one action is selected at a time. The Airborne state brackets each
//! of its occupancies with [`AirborneAction::start`] and
//! [`AirborneAction::reset`] and calls [`AirborneAction::perform`] once per
//! physics step in between. Each action keeps its latches in its own struct so
//! `reset` is the single place they are restored.

mod glide;
mod jump_to_mouse;

pub use glide::Glide;
pub use jump_to_mouse::JumpToMouse;

use serde::{Deserialize, Serialize};

use crate::components::PhysicsBody;
use crate::config::Tuning;
use crate::engine::input::InputFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AirborneKind {
    JumpToMouse,
    Glide,
}

/// Horizontal air steering force. Actions may scale it for the duration of
/// their effect; `reset` puts the multiplier back to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirControl {
    pub base_force: f32,
    pub multiplier: f32,
}

impl AirControl {
    pub fn new(base_force: f32) -> Self {
        Self { base_force, multiplier: 1.0 }
    }

    pub fn force(&self) -> f32 {
        self.base_force * self.multiplier
    }
}

pub trait AirborneAction {
    fn kind(&self) -> AirborneKind;

    /// Start of an Airborne occupancy.
    fn start(&mut self, _body: &mut dyn PhysicsBody) {}

    /// Once per physics step while airborne.
    fn perform(&mut self, body: &mut dyn PhysicsBody, input: &InputFrame, air: &mut AirControl);

    /// End of an Airborne occupancy. Restores everything `perform` changed.
    fn reset(&mut self, body: &mut dyn PhysicsBody, air: &mut AirControl);
}

/// One instance of every action plus the current selection.
pub struct AirborneActions {
    jump_to_mouse: JumpToMouse,
    glide: Glide,
    selected: AirborneKind,
}

impl AirborneActions {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            jump_to_mouse: JumpToMouse::new(tuning.jump_to_mouse.force),
            glide: Glide::new(tuning.glide.drag, tuning.glide.control_multiplier),
            selected: tuning.airborne.action,
        }
    }

    pub fn selected(&self) -> AirborneKind {
        self.selected
    }

    /// Change the selection, returning the previous one. Callers that switch
    /// mid-occupancy must reset the old action and start the new one.
    pub fn select(&mut self, kind: AirborneKind) -> AirborneKind {
        std::mem::replace(&mut self.selected, kind)
    }

    pub fn get_mut(&mut self, kind: AirborneKind) -> &mut dyn AirborneAction {
        match kind {
            AirborneKind::JumpToMouse => &mut self.jump_to_mouse,
            AirborneKind::Glide => &mut self.glide,
        }
    }

    pub fn current_mut(&mut self) -> &mut dyn AirborneAction {
        self.get_mut(self.selected)
    }

    pub fn jump_to_mouse(&self) -> &JumpToMouse {
        &self.jump_to_mouse
    }

    pub fn glide(&self) -> &Glide {
        &self.glide
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_tuning_and_swaps() {
        let mut tuning = Tuning::default();
        tuning.airborne.action = AirborneKind::Glide;
        let mut actions = AirborneActions::new(&tuning);
        assert_eq!(actions.selected(), AirborneKind::Glide);
        assert_eq!(actions.current_mut().kind(), AirborneKind::Glide);

        let old = actions.select(AirborneKind::JumpToMouse);
        assert_eq!(old, AirborneKind::Glide);
        assert_eq!(actions.current_mut().kind(), AirborneKind::JumpToMouse);
    }

    #[test]
    fn glide_multiplies_air_control() {
        let mut air = AirControl::new(20.0);
        assert_eq!(air.force(), 20.0);
        air.multiplier = 4.0;
        assert_eq!(air.force(), 80.0);
    }
}
