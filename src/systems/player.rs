use glam::Vec2;

use crate::components::{Character, MoveState, PhysicsBody, PlayerFsm};
use crate::engine::input::Button;
use crate::error::FsmError;
use crate::fsm::{State, StateMachine};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Step length the wall-stall damping rate is expressed against.
const DAMPING_REFERENCE_STEP: f32 = 0.02;

// ---------------------------------------------------------------------------
// State table
// ---------------------------------------------------------------------------

/// Build the movement state machine.
///
/// Candidate lists are scanned in the order written here. States that should
/// hold while their own condition is true list themselves ahead of the
/// lower-priority fallbacks (Running keeps running while there is input, and
/// only drops to Idle once there is none). Jumping only ever leaves for
/// Airborne, so a released jump keeps its momentum until it is clear of the
/// ground or falling.
pub fn build_player_fsm<B: PhysicsBody>() -> Result<PlayerFsm<B>, FsmError> {
    use MoveState::*;

    StateMachine::new(
        Idle,
        [
            State::new(Idle, Idle.label(), idle_condition::<B>, idle_action::<B>)
                .on_exit(leave_idle::<B>)
                .transitions([Jumping, Running, Airborne]),
            State::new(Running, Running.label(), running_condition::<B>, running_action::<B>)
                .on_frame_update(face_input::<B>)
                .transitions([Jumping, Airborne, Sprinting, Running, Idle]),
            State::new(
                Sprinting,
                Sprinting.label(),
                sprinting_condition::<B>,
                sprinting_action::<B>,
            )
            .on_frame_update(face_input::<B>)
            .transitions([Jumping, Airborne, Sprinting, Running, Idle]),
            State::new(Jumping, Jumping.label(), jumping_condition::<B>, jumping_action::<B>)
                .on_enter(enter_jumping::<B>)
                .on_exit(leave_jumping::<B>)
                .on_frame_update(jumping_update::<B>)
                .transitions([Airborne, Jumping]),
            State::new(Airborne, Airborne.label(), airborne_condition::<B>, airborne_action::<B>)
                .on_enter(enter_airborne::<B>)
                .on_exit(leave_airborne::<B>)
                .on_frame_update(airborne_update::<B>)
                .transitions([WallStall, Airborne, Sprinting, Running, Idle]),
            State::new(
                WallStall,
                WallStall.label(),
                wall_stall_condition::<B>,
                wall_stall_action::<B>,
            )
            .on_enter(enter_wall_stall::<B>)
            .on_exit(leave_wall_stall::<B>)
            .on_frame_update(wall_stall_update::<B>)
            .transitions([WallJump, WallStall, Idle, Airborne]),
            State::new(WallJump, WallJump.label(), wall_jump_condition::<B>, wall_jump_action::<B>)
                .on_enter(enter_wall_jump::<B>)
                .on_frame_update(face_input::<B>)
                .transitions([Idle, Airborne]),
        ],
    )
}

fn face_input<B: PhysicsBody>(c: &mut Character<B>) {
    c.face_input();
}

// ---------------------------------------------------------------------------
// Idle
// ---------------------------------------------------------------------------

fn idle_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    c.contacts.grounded
}

/// Brake against the current motion, or snap to rest once slow enough.
/// The latches keep one occupancy from braking in both directions.
fn idle_action<B: PhysicsBody>(c: &mut Character<B>) {
    let vx = c.body.velocity().x;
    let rest = c.tuning.idle.rest_speed;
    let stopping = c.tuning.idle.stopping_force;

    if vx > rest && !c.brake.stopping_negative {
        c.body.apply_force(Vec2::new(-stopping, 0.0));
        c.brake.stopping_positive = true;
    } else if vx < -rest && !c.brake.stopping_positive {
        c.body.apply_force(Vec2::new(stopping, 0.0));
        c.brake.stopping_negative = true;
    } else {
        c.body.set_velocity(Vec2::ZERO);
    }
    tracing::trace!(state = "Idle", vx);
}

fn leave_idle<B: PhysicsBody>(c: &mut Character<B>) {
    c.brake.stopping_positive = false;
    c.brake.stopping_negative = false;
}

// ---------------------------------------------------------------------------
// Running / Sprinting
// ---------------------------------------------------------------------------

fn running_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    c.input.horizontal != 0.0
}

fn running_action<B: PhysicsBody>(c: &mut Character<B>) {
    let cap = c.tuning.running.max_speed;
    drive_toward_cap(c, cap);
    tracing::trace!(state = "Running", vx = c.body.velocity().x);
}

fn sprinting_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    c.input.held.contains(&Button::Sprint) && c.input.horizontal != 0.0
}

fn sprinting_action<B: PhysicsBody>(c: &mut Character<B>) {
    let cap = c.tuning.running.max_speed + c.tuning.sprinting.sprint_boost;
    drive_toward_cap(c, cap);
    tracing::trace!(state = "Sprinting", vx = c.body.velocity().x);
}

/// Push toward `input * cap`. Turning around (a speed change larger than the
/// cap) adds the stopping force on top of the run force. At or beyond the cap
/// the run force is dropped and the stopping force pulls back under it.
fn drive_toward_cap<B: PhysicsBody>(c: &mut Character<B>, cap: f32) {
    let input = c.input.horizontal;
    let stopping = c.tuning.idle.stopping_force;
    let vx = c.body.velocity().x;

    let speed_difference = input * cap - vx;
    let mut force = c.tuning.running.run_force * input;
    if (speed_difference / cap).abs() > 1.0 {
        force += stopping * input;
    }

    if vx >= cap {
        force = -stopping;
    } else if vx <= -cap {
        force = stopping;
    }

    c.body.apply_force(Vec2::new(force, 0.0));
}

// ---------------------------------------------------------------------------
// Jumping
// ---------------------------------------------------------------------------

fn jumping_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    c.input.held.contains(&Button::Jump)
}

/// Counts every step; only steps within the hold budget (and while the jump
/// is still held) push upward. Counting steps rather than time keeps the apex
/// independent of how frames and physics steps interleave.
fn jumping_action<B: PhysicsBody>(c: &mut Character<B>) {
    c.jump.steps = c.jump.steps.saturating_add(1);
    if c.jump.in_progress() {
        c.body.apply_force(Vec2::new(0.0, c.tuning.jumping.jump_force));
    }
    tracing::trace!(state = "Jumping", step = c.jump.steps, max = c.jump.max_steps);
}

fn enter_jumping<B: PhysicsBody>(c: &mut Character<B>) {
    c.jump.allowed = true;
    c.jump.steps = 0;
}

fn leave_jumping<B: PhysicsBody>(c: &mut Character<B>) {
    c.jump.allowed = false;
}

/// Releasing jump early ends the thrust (variable jump height). The first
/// thrust step always happens, so a tap shorter than one physics step still
/// leaves the ground and Jumping can hand over to Airborne.
fn jumping_update<B: PhysicsBody>(c: &mut Character<B>) {
    if !c.input.held.contains(&Button::Jump) && c.jump.steps > 0 {
        c.jump.allowed = false;
    }
}

// ---------------------------------------------------------------------------
// Airborne
// ---------------------------------------------------------------------------

fn airborne_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    (!c.contacts.grounded && !c.jump.in_progress())
        || c.body.velocity().y < c.tuning.airborne.fall_threshold
}

fn airborne_action<B: PhysicsBody>(c: &mut Character<B>) {
    c.airborne
        .current_mut()
        .perform(&mut c.body, &c.input, &mut c.air);

    // Steering only adds speed up to the cap; it never brakes.
    let input = c.input.horizontal;
    let vx = c.body.velocity().x;
    let max = c.tuning.airborne.max_horizontal_speed;
    let force = if vx <= max && input > 0.0 {
        c.air.force()
    } else if vx >= -max && input < 0.0 {
        -c.air.force()
    } else {
        0.0
    };
    c.body.apply_force(Vec2::new(force, 0.0));
    tracing::trace!(state = "Airborne", vx, force);
}

fn enter_airborne<B: PhysicsBody>(c: &mut Character<B>) {
    c.airborne.current_mut().start(&mut c.body);
}

fn leave_airborne<B: PhysicsBody>(c: &mut Character<B>) {
    c.airborne.current_mut().reset(&mut c.body, &mut c.air);
}

fn airborne_update<B: PhysicsBody>(c: &mut Character<B>) {
    c.face_input();
    c.sense_wall();
}

// ---------------------------------------------------------------------------
// Wall stall
// ---------------------------------------------------------------------------

fn wall_stall_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    c.contacts.against_wall && !c.contacts.grounded
}

/// Sliding up the wall is eased out faster than gravity alone would.
fn wall_stall_action<B: PhysicsBody>(c: &mut Character<B>) {
    let mut velocity = c.body.velocity();
    if velocity.y > 0.0 {
        velocity.y = damp_toward_zero(
            velocity.y,
            c.tuning.wall_stall.damping,
            c.tuning.physics.fixed_dt,
        );
        c.body.set_velocity(velocity);
    }
    tracing::trace!(state = "Wall Stall", vy = velocity.y);
}

/// Remove `rate` of `value` per reference step, scaled to `dt`. Never crosses
/// zero for `rate` in `[0, 1]`.
fn damp_toward_zero(value: f32, rate: f32, dt: f32) -> f32 {
    value * (1.0 - rate).powf(dt / DAMPING_REFERENCE_STEP)
}

fn enter_wall_stall<B: PhysicsBody>(c: &mut Character<B>) {
    c.saved_gravity_scale = Some(c.body.gravity_scale());
    c.body.set_gravity_scale(c.tuning.wall_stall.gravity_scale);
}

fn leave_wall_stall<B: PhysicsBody>(c: &mut Character<B>) {
    if let Some(scale) = c.saved_gravity_scale.take() {
        c.body.set_gravity_scale(scale);
    }
}

fn wall_stall_update<B: PhysicsBody>(c: &mut Character<B>) {
    c.sense_wall();
}

// ---------------------------------------------------------------------------
// Wall jump
// ---------------------------------------------------------------------------

/// Jump pressed while pushing away from the wall being faced.
fn wall_jump_condition<B: PhysicsBody>(c: &Character<B>) -> bool {
    let input = c.input.horizontal;
    c.input.pressed.contains(&Button::Jump) && input != 0.0 && input.signum() != c.facing.sign()
}

fn wall_jump_action<B: PhysicsBody>(c: &mut Character<B>) {
    tracing::trace!(state = "Wall Jump", velocity = ?c.body.velocity());
}

/// Launch along the input direction from a standstill. Holding down makes it
/// a weaker drop-jump.
fn enter_wall_jump<B: PhysicsBody>(c: &mut Character<B>) {
    let launch = Vec2::new(c.input.horizontal, c.input.vertical).normalize_or_zero();
    c.body.set_velocity(Vec2::ZERO);

    let force = if c.input.vertical < 0.0 {
        c.tuning.wall_jump.force / 2.0
    } else {
        c.tuning.wall_jump.force
    };
    c.body.apply_force(launch * force);
    tracing::debug!(?launch, force, "wall jump");
}
