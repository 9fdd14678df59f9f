use glam::{UVec2, Vec2};

use super::{FrameTarget, TextCommand};
use crate::math::color::{to_rgba8, Color};

/// Fixed-advance font metrics in view units at scale 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub advance: f32,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            advance: 6.0,
            width: 5.0,
            ascent: 7.0,
            descent: 1.0,
        }
    }
}

/// Text batch laid out in a virtual view rectangle
///
/// The view (y up) is scaled by the largest whole factor that fits the
/// drawable and centered, so text stays pixel crisp. Commands are collected
/// and handed to a target with [`TextOverlay::finish`].
#[derive(Debug, Clone)]
pub struct TextOverlay {
    view_min: Vec2,
    view_max: Vec2,
    scale: f32,
    offset: Vec2,
    metrics: GlyphMetrics,
    commands: Vec<TextCommand>,
}

impl TextOverlay {
    pub fn new(view_min: Vec2, view_max: Vec2, drawable_size: UVec2) -> Self {
        let view = view_max - view_min;
        let drawable = drawable_size.as_vec2();
        let scale = (drawable.x / view.x).min(drawable.y / view.y).floor().max(1.0);
        let offset = ((drawable - view * scale) * 0.5).round();

        Self {
            view_min,
            view_max,
            scale,
            offset,
            metrics: GlyphMetrics::default(),
            commands: Vec::new(),
        }
    }

    /// Pixels per view unit
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn metrics(&self) -> GlyphMetrics {
        self.metrics
    }

    /// View point (y up) to drawable pixels (y down)
    pub fn to_pixels(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset.x + (point.x - self.view_min.x) * self.scale,
            self.offset.y + (self.view_max.y - point.y) * self.scale,
        )
    }

    /// Bounding box of `text` drawn with its baseline starting at `anchor`
    pub fn text_extents(&self, text: &str, anchor: Vec2, scale: f32) -> (Vec2, Vec2) {
        let count = text.chars().count();
        if count == 0 {
            return (anchor, anchor);
        }

        let m = self.metrics;
        let width = m.advance * (count - 1) as f32 + m.width;
        let min = anchor + Vec2::new(0.0, -m.descent) * scale;
        let max = anchor + Vec2::new(width, m.ascent) * scale;
        (min, max)
    }

    pub fn draw_text(&mut self, text: &str, anchor: Vec2, scale: f32, color: Color) {
        self.commands.push(TextCommand {
            text: text.to_owned(),
            baseline: self.to_pixels(anchor),
            size: self.metrics.ascent * scale * self.scale,
            color: to_rgba8(color),
        });
    }

    pub fn commands(&self) -> &[TextCommand] {
        &self.commands
    }

    /// Submit everything drawn so far
    pub fn finish(self, target: &mut dyn FrameTarget) {
        for command in self.commands {
            target.draw_text(command);
        }
    }
}
