//! Player controller: the movement state machine plus the character it
//! drives, behind two entry points that an outside loop calls at its own
//! rates.
//!
//! - [`PlayerController::frame`] once per render frame: snapshot input and wall
//!   probes, evaluate transitions, run the current frame hook, handle airborne
//!   action selection.
//! - [`PlayerController::physics_step`] once per fixed step: run the current
//!   action, then refresh the grounded sensor.
//!
//! Both take `&mut self`, so they can never interleave.

use crate::airborne::AirborneKind;
use crate::components::{Character, Facing, MoveState, PhysicsBody, PlayerFsm};
use crate::config::Tuning;
use crate::engine::input::{Button, InputFrame, InputSource};
use crate::engine::sensor::SurfaceSensor;
use crate::error::SetupError;
use crate::fsm::Transition;
use crate::systems::build_player_fsm;

/// What a frame produced, for animation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub state: MoveState,
    pub label: &'static str,
    pub facing: Facing,
    /// `true` on the frame the state was entered.
    pub entered: bool,
    pub transition: Option<Transition<MoveState>>,
}

pub struct PlayerController<B> {
    fsm: PlayerFsm<B>,
    character: Character<B>,
}

impl<B: PhysicsBody> PlayerController<B> {
    /// Validate tuning and body, build the state table, start in Idle.
    pub fn new(body: B, tuning: Tuning) -> Result<Self, SetupError> {
        tuning.validate()?;
        if !body.is_ready() {
            return Err(SetupError::BodyNotReady);
        }
        let fsm = build_player_fsm::<B>()?;
        let character = Character::new(body, tuning);

        let jumping = &character.tuning.jumping;
        let physics = &character.tuning.physics;
        tracing::info!(
            max_hold_time = jumping.max_hold_time(physics.gravity),
            max_hold_steps = character.jump.max_steps,
            fixed_dt = physics.fixed_dt,
            airborne = ?character.airborne.selected(),
            "player controller ready"
        );

        Ok(Self { fsm, character })
    }

    /// Frame clock.
    pub fn frame(
        &mut self,
        input: &impl InputSource,
        sensor: &impl SurfaceSensor,
    ) -> FrameReport {
        let c = &mut self.character;
        c.input = InputFrame::sample(input);
        let position = c.body.position();
        c.contacts.wall_left = sensor.wall_gap(position, Facing::Left);
        c.contacts.wall_right = sensor.wall_gap(position, Facing::Right);

        let transition = self.fsm.evaluate_transitions(&mut self.character);
        if let Some(t) = transition {
            tracing::debug!(from = t.from.label(), to = t.to.label(), "transition");
        }

        if self.character.input.pressed.contains(&Button::SelectJumpToMouse) {
            self.select_airborne_action(AirborneKind::JumpToMouse);
        }
        if self.character.input.pressed.contains(&Button::SelectGlide) {
            self.select_airborne_action(AirborneKind::Glide);
        }

        FrameReport {
            state: self.fsm.current(),
            label: self.fsm.current_name(),
            facing: self.character.facing,
            entered: self.fsm.just_entered(),
            transition,
        }
    }

    /// Physics clock.
    pub fn physics_step(&mut self, sensor: &impl SurfaceSensor) {
        self.fsm.run_action(&mut self.character);
        self.sense_ground(sensor);
    }

    /// Refresh the grounded flag without acting. Drivers call this once before
    /// the first frame so a body spawned on the ground starts out grounded.
    pub fn sense_ground(&mut self, sensor: &impl SurfaceSensor) {
        let position = self.character.body.position();
        self.character.contacts.grounded = sensor.is_grounded(position);
    }

    /// Swap the airborne action. Mid-air, the old action is reset and the new
    /// one started so nothing the old one changed leaks into the rest of the
    /// occupancy.
    pub fn select_airborne_action(&mut self, kind: AirborneKind) {
        let c = &mut self.character;
        if c.airborne.selected() == kind {
            return;
        }
        let airborne = self.fsm.current() == MoveState::Airborne;
        if airborne {
            c.airborne.current_mut().reset(&mut c.body, &mut c.air);
        }
        let previous = c.airborne.select(kind);
        if airborne {
            c.airborne.current_mut().start(&mut c.body);
        }
        tracing::info!(?previous, selected = ?kind, "airborne action");
    }

    pub fn state(&self) -> MoveState {
        self.fsm.current()
    }

    pub fn label(&self) -> &'static str {
        self.fsm.current_name()
    }

    pub fn fsm(&self) -> &PlayerFsm<B> {
        &self.fsm
    }

    pub fn character(&self) -> &Character<B> {
        &self.character
    }

    pub fn body(&self) -> &B {
        &self.character.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.character.body
    }
}
