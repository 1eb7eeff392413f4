//! Test doubles for the scene.

use crate::render::{DrawTarget, Paint, Path, Rgba};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    FillRect { w: f64, h: f64 },
    FillPath,
    StrokePath,
}

/// Records every draw call instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<DrawCall>,
}

impl RecordingTarget {
    /// Size of the background fill that follows the most recent clear.
    pub fn last_frame_size(&self) -> Option<(f64, f64)> {
        let start = self.calls.iter().rposition(|c| *c == DrawCall::Clear)?;
        match self.calls.get(start + 1)? {
            DrawCall::FillRect { w, h } => Some((*w, *h)),
            _ => None,
        }
    }

    pub fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Clear).count()
    }
}

impl DrawTarget for RecordingTarget {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, w: f64, h: f64, _paint: &Paint) {
        self.calls.push(DrawCall::FillRect { w, h });
    }

    fn fill_path(&mut self, _path: &Path, _paint: &Paint) {
        self.calls.push(DrawCall::FillPath);
    }

    fn stroke_path(&mut self, _path: &Path, _color: Rgba, _width: f64) {
        self.calls.push(DrawCall::StrokePath);
    }
}
