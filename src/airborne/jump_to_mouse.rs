use glam::Vec2;

use super::{AirControl, AirborneAction, AirborneKind};
use crate::components::PhysicsBody;
use crate::engine::input::{Button, InputFrame};

/// One aimed mid-air jump per Airborne occupancy.
///
/// While the jump is still available it tracks a guide segment from the body
/// to the aim point. Holding fire pushes the body once along the normalized
/// aim direction and spends the jump until the next occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpToMouse {
    force: f32,
    available: bool,
    guide: Option<(Vec2, Vec2)>,
}

impl JumpToMouse {
    pub fn new(force: f32) -> Self {
        Self {
            force,
            available: true,
            guide: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Body-to-aim segment for drawing a guide line, while the jump is
    /// available.
    pub fn guide(&self) -> Option<(Vec2, Vec2)> {
        self.guide
    }
}

impl AirborneAction for JumpToMouse {
    fn kind(&self) -> AirborneKind {
        AirborneKind::JumpToMouse
    }

    fn perform(&mut self, body: &mut dyn PhysicsBody, input: &InputFrame, _air: &mut AirControl) {
        if !self.available {
            return;
        }

        let origin = body.position();
        self.guide = Some((origin, input.aim));

        // Aim on top of the body has no direction; keep the jump for later.
        let direction = (input.aim - origin).normalize_or_zero();
        if direction == Vec2::ZERO {
            return;
        }

        if input.held.contains(&Button::Fire) {
            body.apply_force(direction * self.force);
            self.available = false;
            self.guide = None;
            tracing::debug!(?direction, force = self.force, "aimed jump");
        }
    }

    fn reset(&mut self, _body: &mut dyn PhysicsBody, _air: &mut AirControl) {
        self.available = true;
        self.guide = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Body2D;
    use approx::assert_relative_eq;

    fn fire_at(aim: Vec2) -> InputFrame {
        InputFrame::default().holding(Button::Fire).aiming_at(aim)
    }

    #[test]
    fn fires_once_along_normalized_aim() {
        let mut body = Body2D::new(Vec2::new(1.0, 1.0));
        let mut air = AirControl::new(10.0);
        let mut jump = JumpToMouse::new(500.0);

        jump.perform(&mut body, &fire_at(Vec2::new(4.0, 5.0)), &mut air);
        let force = body.pending_force();
        assert_relative_eq!(force.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(force.y, 400.0, epsilon = 1e-3);
        assert!(!jump.is_available());

        jump.perform(&mut body, &fire_at(Vec2::new(4.0, 5.0)), &mut air);
        assert_eq!(body.pending_force(), force);
    }

    #[test]
    fn reset_rearms() {
        let mut body = Body2D::new(Vec2::ZERO);
        let mut air = AirControl::new(10.0);
        let mut jump = JumpToMouse::new(500.0);

        jump.perform(&mut body, &fire_at(Vec2::X), &mut air);
        jump.reset(&mut body, &mut air);
        assert!(jump.is_available());

        jump.perform(&mut body, &fire_at(Vec2::X), &mut air);
        assert_relative_eq!(body.pending_force().x, 1000.0);
    }

    #[test]
    fn tracks_guide_without_firing() {
        let mut body = Body2D::new(Vec2::ZERO);
        let mut air = AirControl::new(10.0);
        let mut jump = JumpToMouse::new(500.0);
        let aim = Vec2::new(-2.0, 3.0);

        jump.perform(&mut body, &InputFrame::default().aiming_at(aim), &mut air);
        assert_eq!(jump.guide(), Some((Vec2::ZERO, aim)));
        assert_eq!(body.pending_force(), Vec2::ZERO);
        assert!(jump.is_available());
    }

    #[test]
    fn degenerate_aim_keeps_the_jump() {
        let mut body = Body2D::new(Vec2::new(2.0, 2.0));
        let mut air = AirControl::new(10.0);
        let mut jump = JumpToMouse::new(500.0);

        jump.perform(&mut body, &fire_at(Vec2::new(2.0, 2.0)), &mut air);
        assert!(jump.is_available());
        assert_eq!(body.pending_force(), Vec2::ZERO);
    }
}
