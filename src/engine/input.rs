use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    Sprint,
    /// Airborne action trigger (aim-jump / glide).
    Fire,
    SelectJumpToMouse,
    SelectGlide,
}

/// Polled input, as provided by whatever samples the real devices.
pub trait InputSource {
    /// Axis value in `[-1, 1]`.
    fn axis(&self, axis: Axis) -> f32;
    fn button_held(&self, button: Button) -> bool;
    /// Went down this frame.
    fn button_pressed(&self, button: Button) -> bool;
    /// World-space aim point.
    fn aim_target(&self) -> Vec2;
}

/// One frame's worth of input, copied out of an [`InputSource`] so every
/// hook in the frame (and every physics step until the next frame) sees the
/// same values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub horizontal: f32,
    pub vertical: f32,
    pub held: HashSet<Button>,
    pub pressed: HashSet<Button>,
    pub aim: Vec2,
}

const BUTTONS: [Button; 5] = [
    Button::Jump,
    Button::Sprint,
    Button::Fire,
    Button::SelectJumpToMouse,
    Button::SelectGlide,
];

impl InputFrame {
    pub fn sample(source: &impl InputSource) -> Self {
        Self {
            horizontal: source.axis(Axis::Horizontal).clamp(-1.0, 1.0),
            vertical: source.axis(Axis::Vertical).clamp(-1.0, 1.0),
            held: BUTTONS.into_iter().filter(|&b| source.button_held(b)).collect(),
            pressed: BUTTONS.into_iter().filter(|&b| source.button_pressed(b)).collect(),
            aim: source.aim_target(),
        }
    }

    pub fn with_axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn holding(mut self, button: Button) -> Self {
        self.held.insert(button);
        self
    }

    /// Held and pressed this frame.
    pub fn pressing(mut self, button: Button) -> Self {
        self.held.insert(button);
        self.pressed.insert(button);
        self
    }

    pub fn aiming_at(mut self, aim: Vec2) -> Self {
        self.aim = aim;
        self
    }
}

impl InputSource for InputFrame {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    fn button_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    fn button_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn aim_target(&self) -> Vec2 {
        self.aim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_clamps_axes() {
        let raw = InputFrame::default().with_axes(3.0, -7.0).holding(Button::Jump);
        let frame = InputFrame::sample(&raw);
        assert_eq!(frame.horizontal, 1.0);
        assert_eq!(frame.vertical, -1.0);
        assert!(frame.button_held(Button::Jump));
        assert!(!frame.button_pressed(Button::Jump));
    }
}
