use std::collections::BTreeMap;

use glam::Vec2;
use hecs::World;

use crate::components::{Body2D, MoveState, PhysicsBody};
use crate::config::Tuning;
use crate::controller::PlayerController;
use crate::engine::animation::{AnimationSink, LabelTrace};
use crate::engine::time::FixedStepClock;
use crate::error::SetupError;
use crate::scene::script::ScriptedInput;
use crate::scene::test_scene::load_test_scene;
use crate::systems::{physics_step, WorldProbe};

/// How the headless run paces its frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    /// Wall-clock length of the run. The script may end earlier.
    pub seconds: f32,
    pub fps: f32,
    /// Frame time wobble as a fraction of the nominal frame time, in `[0, 1)`.
    pub jitter: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seconds: 9.0,
            fps: 60.0,
            jitter: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub frames: u32,
    pub physics_steps: u32,
    pub transitions: u32,
    pub final_state: MoveState,
    pub final_position: Vec2,
    /// Frames spent showing each animation label.
    pub label_frames: BTreeMap<&'static str, u32>,
    /// Every state the run passed through, in order, without repeats.
    pub visited: Vec<MoveState>,
}

pub struct SimApp {
    world: World,
    controller: PlayerController<Body2D>,
    clock: FixedStepClock,
    input: ScriptedInput,
    animation: LabelTrace,
    settings: SimSettings,
    gravity: Vec2,
}

impl SimApp {
    pub fn new(tuning: Tuning, settings: SimSettings) -> Result<Self, SetupError> {
        Self::with_script(tuning, settings, ScriptedInput::demo())
    }

    pub fn with_script(
        tuning: Tuning,
        settings: SimSettings,
        input: ScriptedInput,
    ) -> Result<Self, SetupError> {
        let mut world = World::new();
        let start = load_test_scene(&mut world);

        let gravity = Vec2::new(0.0, -tuning.physics.gravity);
        let clock = FixedStepClock::new(tuning.physics.fixed_dt);
        let mut controller = PlayerController::new(Body2D::new(start), tuning)?;
        let probe = WorldProbe::new(&world, &controller.character().tuning.sensing);
        controller.sense_ground(&probe);

        Ok(Self {
            world,
            controller,
            clock,
            input,
            animation: LabelTrace::default(),
            settings,
            gravity,
        })
    }

    pub fn controller(&self) -> &PlayerController<Body2D> {
        &self.controller
    }

    pub fn run(&mut self) -> SimSummary {
        let nominal = 1.0 / self.settings.fps.max(1.0);
        let mut elapsed = 0.0;
        let mut frames = 0u32;
        let mut physics_steps = 0u32;
        let mut transitions = 0u32;
        let mut visited = vec![self.controller.state()];

        while elapsed < self.settings.seconds {
            let dt = self.frame_time(nominal, frames);
            let (changed, steps) = self.update(dt);

            frames += 1;
            physics_steps += steps;
            elapsed += dt;
            if changed {
                transitions += 1;
                let state = self.controller.state();
                if visited.last() != Some(&state) {
                    visited.push(state);
                }
            }
        }

        let summary = SimSummary {
            frames,
            physics_steps,
            transitions,
            final_state: self.controller.state(),
            final_position: self.controller.body().position(),
            label_frames: self.animation.frames.clone(),
            visited,
        };
        tracing::info!(
            frames = summary.frames,
            physics_steps = summary.physics_steps,
            transitions = summary.transitions,
            final_state = summary.final_state.label(),
            position = ?summary.final_position,
            "run finished"
        );
        summary
    }

    /// One render frame: input, transitions, animation, then as many fixed
    /// steps as the frame time has paid for. Returns whether the state changed
    /// and how many steps ran.
    fn update(&mut self, dt: f32) -> (bool, u32) {
        self.input.advance(dt);

        let probe = WorldProbe::new(&self.world, &self.controller.character().tuning.sensing);

        let report = self.controller.frame(&self.input, &probe);
        self.animation.play(report.label, report.facing);

        let steps = self.clock.advance(dt);
        let step = self.clock.step();
        for _ in 0..steps {
            self.controller.physics_step(&probe);
            let contacts = physics_step(&self.world, self.controller.body_mut(), self.gravity, step);
            if !contacts.is_empty() {
                tracing::trace!(count = contacts.len(), "contacts");
            }
        }

        (report.transition.is_some(), steps)
    }

    /// Deterministic wobble around the nominal frame time, so frames and
    /// physics steps do not line up one to one.
    fn frame_time(&self, nominal: f32, frame: u32) -> f32 {
        let jitter = self.settings.jitter.clamp(0.0, 0.95);
        let phase = (frame as f32 * 1.618).sin();
        nominal * (1.0 + jitter * phase)
    }
}
