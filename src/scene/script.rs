use std::collections::HashSet;

use glam::Vec2;

use crate::engine::input::{Axis, Button, InputFrame, InputSource};

/// A stretch of constant input.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub duration: f32,
    pub horizontal: f32,
    pub vertical: f32,
    pub held: Vec<Button>,
    pub aim: Vec2,
}

impl Segment {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            horizontal: 0.0,
            vertical: 0.0,
            held: Vec::new(),
            aim: Vec2::ZERO,
        }
    }

    pub fn axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn hold(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.held.extend(buttons);
        self
    }

    pub fn aim(mut self, target: Vec2) -> Self {
        self.aim = target;
        self
    }
}

/// Plays back a list of segments as if a player were at the keyboard.
///
/// A button counts as pressed on the first sample where it is held after a
/// sample where it was not, so two back-to-back segments holding the same
/// button produce one press.
pub struct ScriptedInput {
    segments: Vec<Segment>,
    elapsed: f32,
    current: InputFrame,
}

impl ScriptedInput {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            elapsed: 0.0,
            current: InputFrame::default(),
        }
    }

    /// Run right, sprint into a jump, cling to the wall, kick off it, glide
    /// down, then take an aimed mid-air jump back toward the wall.
    pub fn demo() -> Self {
        use Button::*;
        Self::new(vec![
            Segment::new(0.4),
            Segment::new(1.0).axes(1.0, 0.0),
            Segment::new(0.4).axes(1.0, 0.0).hold([Sprint]),
            Segment::new(0.3).axes(1.0, 0.0).hold([Sprint, Jump]),
            Segment::new(0.6).axes(1.0, 0.0),
            Segment::new(0.1).axes(-1.0, 1.0).hold([Jump]),
            Segment::new(0.2).axes(-1.0, 0.0),
            Segment::new(0.05).axes(-1.0, 0.0).hold([SelectGlide]),
            Segment::new(0.9).axes(-1.0, 0.0).hold([Fire]),
            Segment::new(1.5),
            Segment::new(0.05).hold([SelectJumpToMouse]),
            Segment::new(0.25).axes(1.0, 0.0).hold([Jump]),
            Segment::new(0.3).axes(1.0, 0.0).aim(Vec2::new(12.0, 8.0)),
            Segment::new(0.1)
                .axes(1.0, 0.0)
                .hold([Fire])
                .aim(Vec2::new(12.0, 8.0)),
            Segment::new(2.0),
        ])
    }

    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Sample the script at the current time, then move the clock on by `dt`.
    pub fn advance(&mut self, dt: f32) {
        let next = match self.segment_at(self.elapsed) {
            Some(segment) => {
                let held: HashSet<Button> = segment.held.iter().copied().collect();
                let pressed = held.difference(&self.current.held).copied().collect();
                InputFrame {
                    horizontal: segment.horizontal,
                    vertical: segment.vertical,
                    held,
                    pressed,
                    aim: segment.aim,
                }
            }
            None => InputFrame::default(),
        };
        self.current = next;
        self.elapsed += dt.max(0.0);
    }

    fn segment_at(&self, t: f32) -> Option<&Segment> {
        let mut start = 0.0;
        for segment in &self.segments {
            if t < start + segment.duration {
                return Some(segment);
            }
            start += segment.duration;
        }
        None
    }
}

impl InputSource for ScriptedInput {
    fn axis(&self, axis: Axis) -> f32 {
        self.current.axis(axis)
    }

    fn button_held(&self, button: Button) -> bool {
        self.current.button_held(button)
    }

    fn button_pressed(&self, button: Button) -> bool {
        self.current.button_pressed(button)
    }

    fn aim_target(&self) -> Vec2 {
        self.current.aim
    }
}
