use crate::{
    anim::frame::Frame,
    foundation::core::{Circle, Line, Point, Rgba8},
};

/// A 2D drawing target in viewport pixel coordinates.
pub trait DrawSurface {
    fn fill_background(&mut self, color: Rgba8);
    fn draw_line(&mut self, line: Line, color: Rgba8, width: f64);
    fn draw_circle(&mut self, circle: Circle, color: Rgba8, width: f64);
    fn fill_marker(&mut self, center: Point, radius: f64, color: Rgba8);
    fn draw_polyline(&mut self, points: &[Point], color: Rgba8, width: f64);
}

/// Colors and stroke widths for [`draw_frame`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    pub background: Rgba8,
    pub shaft_color: Rgba8,
    pub shaft_width: f64,
    pub guide_color: Rgba8,
    pub guide_width: f64,
    pub tip_color: Rgba8,
    pub tip_radius: f64,
    pub trace_color: Rgba8,
    pub trace_width: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::WHITE,
            shaft_color: Rgba8::BLACK,
            shaft_width: 2.0,
            guide_color: Rgba8::opaque(200, 200, 200),
            guide_width: 1.0,
            tip_color: Rgba8::BLACK,
            tip_radius: 2.0,
            trace_color: Rgba8::opaque(0, 255, 0),
            trace_width: 2.0,
        }
    }
}

/// Paint one frame: background, each needle's shaft and guide circle, the tip
/// marker, then the trace on top.
pub fn draw_frame(surface: &mut dyn DrawSurface, frame: &Frame<'_>, style: &FrameStyle) {
    surface.fill_background(style.background);

    for (shaft, guide) in frame.shafts.iter().zip(&frame.guides) {
        surface.draw_line(*shaft, style.shaft_color, style.shaft_width);
        surface.draw_circle(*guide, style.guide_color, style.guide_width);
    }

    surface.fill_marker(frame.tip, style.tip_radius, style.tip_color);

    if frame.trace.len() > 1 {
        surface.draw_polyline(frame.trace, style.trace_color, style.trace_width);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
