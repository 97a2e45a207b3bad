use crate::foundation::{
    core::Rgba8,
    error::{EpicycleError, EpicycleResult},
};

pub mod cpu;
pub mod surface;

/// Rasterized frame, row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite over `background` (its alpha is ignored) into straight RGBA8
    /// with every alpha at 255. `out` is cleared first.
    pub fn flatten_into(&self, background: Rgba8, out: &mut Vec<u8>) -> EpicycleResult<()> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(EpicycleError::validation(format!(
                "frame buffer holds {} bytes, {}x{} RGBA8 needs {expected}",
                self.data.len(),
                self.width,
                self.height
            )));
        }

        let bg = [background.r, background.g, background.b].map(u32::from);
        out.clear();
        out.reserve(expected);
        for px in self.data.chunks_exact(4) {
            let alpha = u32::from(px[3]);
            let uncovered = 255 - alpha;
            for (&c, bg_c) in px[..3].iter().zip(bg) {
                let c = u32::from(c);
                let src = if self.premultiplied { c } else { div255(c * alpha) };
                out.push((src + div255(bg_c * uncovered)).min(255) as u8);
            }
            out.push(255);
        }
        Ok(())
    }
}

fn div255(x: u32) -> u32 {
    (x + 127) / 255
}

#[cfg(test)]
#[path = "../tests/unit/render/frame.rs"]
mod tests;
