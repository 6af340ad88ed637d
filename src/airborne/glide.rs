use super::{AirControl, AirborneAction, AirborneKind};
use crate::components::PhysicsBody;
use crate::engine::input::{Button, InputFrame};

/// Hold fire while falling to glide: high drag and stronger air steering.
/// Letting go, or moving upward, drops back to zero drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Glide {
    drag: f32,
    control_multiplier: f32,
    gliding: bool,
}

impl Glide {
    pub fn new(drag: f32, control_multiplier: f32) -> Self {
        Self {
            drag,
            control_multiplier,
            gliding: false,
        }
    }

    pub fn is_gliding(&self) -> bool {
        self.gliding
    }
}

impl AirborneAction for Glide {
    fn kind(&self) -> AirborneKind {
        AirborneKind::Glide
    }

    fn perform(&mut self, body: &mut dyn PhysicsBody, input: &InputFrame, air: &mut AirControl) {
        let gliding = input.held.contains(&Button::Fire) && body.velocity().y <= 0.0;
        if gliding {
            body.set_drag(self.drag);
            air.multiplier = self.control_multiplier;
        } else {
            body.set_drag(0.0);
            air.multiplier = 1.0;
        }
        if gliding != self.gliding {
            tracing::debug!(gliding, "glide");
            self.gliding = gliding;
        }
    }

    fn reset(&mut self, body: &mut dyn PhysicsBody, air: &mut AirControl) {
        body.set_drag(0.0);
        air.multiplier = 1.0;
        self.gliding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Body2D;
    use glam::Vec2;

    #[test]
    fn glides_only_while_held_and_not_rising() {
        let mut body = Body2D::new(Vec2::ZERO);
        body.velocity = Vec2::new(0.0, -2.0);
        let mut air = AirControl::new(20.0);
        let mut glide = Glide::new(5.0, 4.0);
        let held = InputFrame::default().holding(Button::Fire);

        glide.perform(&mut body, &held, &mut air);
        assert_eq!(body.drag, 5.0);
        assert_eq!(air.force(), 80.0);
        assert!(glide.is_gliding());

        body.velocity.y = 1.0;
        glide.perform(&mut body, &held, &mut air);
        assert_eq!(body.drag, 0.0);
        assert_eq!(air.force(), 20.0);

        body.velocity.y = -1.0;
        glide.perform(&mut body, &InputFrame::default(), &mut air);
        assert_eq!(body.drag, 0.0);
        assert!(!glide.is_gliding());
    }

    #[test]
    fn reset_clears_drag_and_multiplier() {
        let mut body = Body2D::new(Vec2::ZERO);
        body.velocity.y = -1.0;
        let mut air = AirControl::new(20.0);
        let mut glide = Glide::new(5.0, 4.0);

        glide.perform(&mut body, &InputFrame::default().holding(Button::Fire), &mut air);
        glide.reset(&mut body, &mut air);
        assert_eq!(body.drag, 0.0);
        assert_eq!(air.multiplier, 1.0);
        assert!(!glide.is_gliding());
    }
}
