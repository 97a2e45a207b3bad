use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Circle, Line, Point, Rgba8, Viewport},
        error::{EpicycleError, EpicycleResult},
    },
    render::{FrameRGBA, surface::DrawSurface},
};

/// Tolerance used when flattening circles into curves.
const CIRCLE_TOLERANCE: f64 = 0.1;

/// Software rasterizer surface backed by `vello_cpu`.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl CpuSurface {
    pub fn new(viewport: Viewport) -> EpicycleResult<Self> {
        let width: u16 = viewport
            .width
            .try_into()
            .map_err(|_| EpicycleError::render("surface width exceeds u16"))?;
        let height: u16 = viewport
            .height
            .try_into()
            .map_err(|_| EpicycleError::render("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(EpicycleError::render("surface width/height must be non-zero"));
        }

        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Rasterize everything drawn so far. Pixels are premultiplied RGBA8.
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
    }
}

impl DrawSurface for CpuSurface {
    fn fill_background(&mut self, color: Rgba8) {
        self.set_color(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn draw_line(&mut self, line: Line, color: Rgba8, width: f64) {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(line.p0));
        path.line_to(point_to_cpu(line.p1));
        self.set_color(color);
        self.set_stroke_width(width);
        self.ctx.stroke_path(&path);
    }

    fn draw_circle(&mut self, circle: Circle, color: Rgba8, width: f64) {
        if circle.radius <= 0.0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new(point_to_cpu(circle.center), circle.radius)
            .to_path(CIRCLE_TOLERANCE);
        self.set_color(color);
        self.set_stroke_width(width);
        self.ctx.stroke_path(&path);
    }

    fn fill_marker(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius)
            .to_path(CIRCLE_TOLERANCE);
        self.set_color(color);
        self.ctx.fill_path(&path);
    }

    fn draw_polyline(&mut self, points: &[Point], color: Rgba8, width: f64) {
        let mut pts = points.iter();
        let Some(&first) = pts.next() else {
            return;
        };
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(first));
        for &p in pts {
            path.line_to(point_to_cpu(p));
        }
        self.set_color(color);
        self.set_stroke_width(width);
        self.ctx.stroke_path(&path);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
