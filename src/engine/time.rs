/// Turns variable frame times into a whole number of fixed physics steps.
///
/// Leftover time carries into the next frame. `alpha` is how far the frame
/// falls between the last step and the next one (for render interpolation).
pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
    pub alpha: f32,
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            alpha: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `frame_dt` seconds and return how many physics steps are due.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.alpha = self.accumulator / self.step;
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_frames_can_run_zero_steps() {
        let mut clock = FixedStepClock::new(0.02);
        assert_eq!(clock.advance(0.007), 0);
        assert_eq!(clock.advance(0.007), 0);
        assert_eq!(clock.advance(0.007), 1);
    }

    #[test]
    fn long_frames_run_several_steps() {
        let mut clock = FixedStepClock::new(0.02);
        assert_eq!(clock.advance(0.065), 3);
        assert!(clock.alpha > 0.2 && clock.alpha < 0.3);
    }

    #[test]
    fn total_steps_track_total_time() {
        let mut clock = FixedStepClock::new(0.02);
        let frames = [0.013, 0.031, 0.004, 0.05, 0.017, 0.016, 0.079];
        let steps: u32 = frames.iter().map(|&dt| clock.advance(dt)).sum();
        let total: f32 = frames.iter().sum();
        assert_eq!(steps, (total / 0.02) as u32);
    }
}
