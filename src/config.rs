//! Controller tuning.
//!
//! Every section defaults independently, so a tuning file only has to name
//! what it changes:
//!
//! ```toml
//! [running]
//! max_speed = 8.0
//!
//! [wall_stall]
//! damping = 0.6
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::airborne::AirborneKind;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub sensing: SensingTuning,
    pub idle: IdleTuning,
    pub running: RunningTuning,
    pub sprinting: SprintingTuning,
    pub jumping: JumpingTuning,
    pub airborne: AirborneTuning,
    pub wall_stall: WallStallTuning,
    pub wall_jump: WallJumpTuning,
    pub jump_to_mouse: JumpToMouseTuning,
    pub glide: GlideTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Magnitude of world gravity (m/s²). Also feeds the jump hold time.
    pub gravity: f32,
    /// Fixed physics step in seconds.
    pub fixed_dt: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self { gravity: 9.81, fixed_dt: 0.02 }
    }
}

/// Ray probe placement, relative to the body center. Only the sensing
/// collaborator reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingTuning {
    pub ankles_ray_offset: f32,
    pub ankles_ray_length: f32,
    pub chest_ray_offset: f32,
    pub chest_ray_length: f32,
}

impl Default for SensingTuning {
    fn default() -> Self {
        Self {
            ankles_ray_offset: 0.65,
            ankles_ray_length: 0.2,
            chest_ray_offset: 0.2,
            chest_ray_length: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleTuning {
    /// Braking force, also reused as the turn-around boost while running.
    pub stopping_force: f32,
    /// Horizontal speed below which Idle snaps velocity to zero.
    pub rest_speed: f32,
}

impl Default for IdleTuning {
    fn default() -> Self {
        Self { stopping_force: 30.0, rest_speed: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunningTuning {
    pub run_force: f32,
    pub max_speed: f32,
}

impl Default for RunningTuning {
    fn default() -> Self {
        Self { run_force: 40.0, max_speed: 6.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintingTuning {
    /// Added on top of `running.max_speed`.
    pub sprint_boost: f32,
}

impl Default for SprintingTuning {
    fn default() -> Self {
        Self { sprint_boost: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpingTuning {
    pub max_height: f32,
    /// Upward force per step while the jump is held. Must exceed gravity.
    pub jump_force: f32,
}

impl Default for JumpingTuning {
    fn default() -> Self {
        Self { max_height: 3.0, jump_force: 60.0 }
    }
}

impl JumpingTuning {
    /// Longest time the jump force may be held so the apex lands at
    /// `max_height`: `sqrt(2·h·g / (F² − F·g))`.
    pub fn max_hold_time(&self, gravity: f32) -> f32 {
        let numerator = 2.0 * self.max_height * gravity;
        let denominator = self.jump_force * self.jump_force - self.jump_force * gravity;
        (numerator / denominator).sqrt()
    }

    /// [`max_hold_time`](Self::max_hold_time) in whole physics steps
    /// (truncated).
    pub fn max_hold_steps(&self, gravity: f32, fixed_dt: f32) -> u32 {
        (self.max_hold_time(gravity) / fixed_dt) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirborneTuning {
    pub max_horizontal_speed: f32,
    pub control_force: f32,
    /// Vertical speed below which a body counts as falling.
    pub fall_threshold: f32,
    /// Airborne action selected at startup.
    pub action: AirborneKind,
}

impl Default for AirborneTuning {
    fn default() -> Self {
        Self {
            max_horizontal_speed: 6.0,
            control_force: 20.0,
            fall_threshold: -0.1,
            action: AirborneKind::JumpToMouse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallStallTuning {
    /// Gravity scale while stuck to a wall.
    pub gravity_scale: f32,
    /// Fraction of upward speed removed per 0.02 s, in `[0, 1]`.
    pub damping: f32,
}

impl Default for WallStallTuning {
    fn default() -> Self {
        Self { gravity_scale: 0.2, damping: 0.8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallJumpTuning {
    pub force: f32,
}

impl Default for WallJumpTuning {
    fn default() -> Self {
        Self { force: 600.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpToMouseTuning {
    pub force: f32,
}

impl Default for JumpToMouseTuning {
    fn default() -> Self {
        Self { force: 500.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlideTuning {
    pub drag: f32,
    /// Multiplier on airborne control force while gliding.
    pub control_multiplier: f32,
}

impl Default for GlideTuning {
    fn default() -> Self {
        Self { drag: 5.0, control_multiplier: 4.0 }
    }
}

impl Tuning {
    /// Read and validate a TOML tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to TOML. Used by `--dump-config`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("physics.gravity", self.physics.gravity)?;
        positive("physics.fixed_dt", self.physics.fixed_dt)?;
        positive("running.max_speed", self.running.max_speed)?;
        non_negative("running.run_force", self.running.run_force)?;
        non_negative("idle.stopping_force", self.idle.stopping_force)?;
        non_negative("idle.rest_speed", self.idle.rest_speed)?;
        non_negative("sprinting.sprint_boost", self.sprinting.sprint_boost)?;
        positive("jumping.max_height", self.jumping.max_height)?;
        if self.jumping.jump_force <= self.physics.gravity {
            return Err(invalid(
                "jumping.jump_force",
                format!(
                    "{} must exceed gravity ({})",
                    self.jumping.jump_force, self.physics.gravity
                ),
            ));
        }
        non_negative("airborne.max_horizontal_speed", self.airborne.max_horizontal_speed)?;
        non_negative("airborne.control_force", self.airborne.control_force)?;
        non_negative("wall_stall.gravity_scale", self.wall_stall.gravity_scale)?;
        if !(0.0..=1.0).contains(&self.wall_stall.damping) {
            return Err(invalid(
                "wall_stall.damping",
                format!("{} is outside [0, 1]", self.wall_stall.damping),
            ));
        }
        non_negative("wall_jump.force", self.wall_jump.force)?;
        non_negative("jump_to_mouse.force", self.jump_to_mouse.force)?;
        non_negative("glide.drag", self.glide.drag)?;
        positive("glide.control_multiplier", self.glide.control_multiplier)?;
        positive("sensing.ankles_ray_length", self.sensing.ankles_ray_length)?;
        positive("sensing.chest_ray_length", self.sensing.chest_ray_length)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be positive", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be non-negative", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tuning = Tuning::from_toml(
            r#"
            [running]
            max_speed = 8.0

            [airborne]
            action = "glide"
            "#,
        )
        .unwrap();
        assert_eq!(tuning.running.max_speed, 8.0);
        assert_eq!(tuning.running.run_force, RunningTuning::default().run_force);
        assert_eq!(tuning.airborne.action, AirborneKind::Glide);
        assert_eq!(tuning.glide, GlideTuning::default());
    }

    #[test]
    fn dump_round_trips_through_parser() {
        let text = Tuning::default().to_toml().unwrap();
        assert_eq!(Tuning::from_toml(&text).unwrap(), Tuning::default());
    }

    #[test]
    fn dump_failures_surface_as_config_errors() {
        let cause = <toml::ser::Error as serde::ser::Error>::custom("unsupported value");
        let err = ConfigError::from(cause);
        assert!(matches!(err, ConfigError::Serialize(_)));
        assert!(err.to_string().starts_with("failed to serialize tuning"));
    }

    #[test]
    fn weak_jump_force_is_rejected() {
        let err = Tuning::from_toml("[jumping]\njump_force = 5.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "jumping.jump_force", .. }
        ));
    }

    #[test]
    fn damping_outside_unit_range_is_rejected() {
        let err = Tuning::from_toml("[wall_stall]\ndamping = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "wall_stall.damping", .. }
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = Tuning::from_toml("[running\nmax_speed = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Tuning::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn jump_hold_time_matches_kinematics() {
        let jump = JumpingTuning { max_height: 3.0, jump_force: 60.0 };
        let g = 9.81;
        let t = jump.max_hold_time(g);
        // Thrust phase plus ballistic rise must reach the requested height.
        let v = (jump.jump_force - g) * t;
        let thrust_height = 0.5 * (jump.jump_force - g) * t * t;
        let coast_height = v * v / (2.0 * g);
        assert_relative_eq!(thrust_height + coast_height, 3.0, epsilon = 1e-3);
        assert_eq!(jump.max_hold_steps(g, 0.02), (t / 0.02) as u32);
    }
}
