use std::collections::BTreeMap;

use crate::components::Facing;

/// Receives the active state's label every frame. Playing the matching clip
/// is the sink's business.
pub trait AnimationSink {
    fn play(&mut self, label: &'static str, facing: Facing);
}

/// Sink that logs label changes and counts frames per label.
#[derive(Debug, Default)]
pub struct LabelTrace {
    current: Option<&'static str>,
    pub frames: BTreeMap<&'static str, u32>,
}

impl AnimationSink for LabelTrace {
    fn play(&mut self, label: &'static str, facing: Facing) {
        if self.current != Some(label) {
            tracing::info!(label, ?facing, "animation");
            self.current = Some(label);
        }
        *self.frames.entry(label).or_default() += 1;
    }
}
