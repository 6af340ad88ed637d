use crate::airborne::{AirControl, AirborneActions};
use crate::components::PhysicsBody;
use crate::config::Tuning;
use crate::engine::input::InputFrame;
use crate::fsm::StateMachine;

// ---------------------------------------------------------------------------
// Player state machine
// ---------------------------------------------------------------------------

/// All discrete movement states.
///
/// Conditions, actions and hooks live in `src/systems/player.rs` so that this
/// file stays pure data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveState {
    /// Grounded with no locomotion input; brakes to a stop.
    Idle,
    Running,
    /// Sprint modifier held while running.
    Sprinting,
    /// Jump held; upward force for a bounded number of steps.
    Jumping,
    /// Off the ground (or falling); the selected airborne action is active.
    Airborne,
    /// Clinging to a wall with reduced gravity.
    WallStall,
    /// Launch away from the wall.
    WallJump,
}

impl MoveState {
    /// Animation / diagnostics label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Sprinting => "Sprinting",
            Self::Jumping => "Jumping",
            Self::Airborne => "Airborne",
            Self::WallStall => "Wall Stall",
            Self::WallJump => "Wall Jump",
        }
    }
}

/// FSM driving a [`Character`].
pub type PlayerFsm<B> = StateMachine<MoveState, Character<B>>;

// ---------------------------------------------------------------------------
// Character context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `+1.0` facing right, `-1.0` facing left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Surface contact as the states see it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contacts {
    /// Refreshed after every physics step.
    pub grounded: bool,
    /// Latched from the wall probe in the facing direction, only by the frame
    /// hooks of Airborne and WallStall.
    pub against_wall: bool,
    /// Raw wall probes (gap to the wall), sampled at the start of every frame.
    pub wall_left: Option<f32>,
    pub wall_right: Option<f32>,
}

impl Contacts {
    pub fn wall_probe(&self, facing: Facing) -> Option<f32> {
        match facing {
            Facing::Left => self.wall_left,
            Facing::Right => self.wall_right,
        }
    }
}

/// Idle's braking direction lock. Prevents flipping between braking right
/// and braking left within one occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrakeLatch {
    pub stopping_positive: bool,
    pub stopping_negative: bool,
}

/// Variable-height jump bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTracker {
    /// Jumping actions run this occupancy.
    pub steps: u32,
    /// Upper bound on steps that may apply jump force.
    pub max_steps: u32,
    /// Cleared when jump is released or the state is left.
    pub allowed: bool,
}

impl JumpTracker {
    pub fn new(max_steps: u32) -> Self {
        Self {
            steps: 0,
            max_steps,
            allowed: false,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.steps <= self.max_steps && self.allowed
    }
}

/// Everything the movement states read and write.
pub struct Character<B> {
    pub body: B,
    pub input: InputFrame,
    pub contacts: Contacts,
    pub facing: Facing,
    pub brake: BrakeLatch,
    pub jump: JumpTracker,
    /// Gravity scale saved on entering WallStall.
    pub saved_gravity_scale: Option<f32>,
    pub air: AirControl,
    pub airborne: AirborneActions,
    pub tuning: Tuning,
}

impl<B: PhysicsBody> Character<B> {
    pub fn new(body: B, tuning: Tuning) -> Self {
        let max_steps = tuning
            .jumping
            .max_hold_steps(tuning.physics.gravity, tuning.physics.fixed_dt);
        Self {
            body,
            input: InputFrame::default(),
            contacts: Contacts::default(),
            facing: Facing::Right,
            brake: BrakeLatch::default(),
            jump: JumpTracker::new(max_steps),
            saved_gravity_scale: None,
            air: AirControl::new(tuning.airborne.control_force),
            airborne: AirborneActions::new(&tuning),
            tuning,
        }
    }

    /// Turn toward the horizontal input, if any.
    pub fn face_input(&mut self) {
        if self.input.horizontal < 0.0 {
            self.facing = Facing::Left;
        } else if self.input.horizontal > 0.0 {
            self.facing = Facing::Right;
        }
    }

    /// Latch the wall probe in the facing direction. On first contact the
    /// body is moved across the gap so the chest ray sits on the wall face.
    pub fn sense_wall(&mut self) {
        let gap = self.contacts.wall_probe(self.facing);
        if let (Some(gap), false) = (gap, self.contacts.against_wall) {
            let mut position = self.body.position();
            position.x += gap * self.facing.sign();
            self.body.set_position(position);
            tracing::debug!(gap, facing = ?self.facing, "wall contact");
        }
        self.contacts.against_wall = gap.is_some();
    }
}
