use crate::probe::error::ProbeError;
use crate::probe::types::{Screenshot, BYTES_PER_PIXEL};

/// A rectangle in framebuffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    fn fits(&self, width: usize, height: usize) -> bool {
        self.x + self.width <= width && self.y + self.height <= height
    }
}

/// Local copy of the remote screen, kept up to date from RFB updates.
#[derive(Debug, Default)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    /// One flag per pixel: has any update covered it since the last resize?
    painted: Vec<bool>,
    unpainted: usize,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a blank screen of the given size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height * BYTES_PER_PIXEL];
        self.painted = vec![false; width * height];
        self.unpainted = width * height;
    }

    /// A size is known and at least one update has been drawn.
    pub fn is_ready(&self) -> bool {
        !self.painted.is_empty() && self.unpainted < self.painted.len()
    }

    /// Every pixel has been covered by an update since the last resize.
    pub fn is_complete(&self) -> bool {
        !self.painted.is_empty() && self.unpainted == 0
    }

    /// Paint raw pixel data (row-major, 4 bytes per pixel) into `region`.
    pub fn draw(&mut self, region: Region, data: &[u8]) -> Result<(), ProbeError> {
        self.check(region, "draw")?;
        let row_len = region.width * BYTES_PER_PIXEL;
        if data.len() < row_len * region.height {
            return Err(ProbeError::framebuffer(format!(
                "draw at {:?} needs {} bytes, got {}",
                region,
                row_len * region.height,
                data.len()
            )));
        }

        for row in 0..region.height {
            let dst = self.offset(region.x, region.y + row);
            let src = row * row_len;
            self.pixels[dst..dst + row_len].copy_from_slice(&data[src..src + row_len]);
        }
        self.mark_painted(region);
        Ok(())
    }

    /// Copy the pixels under `src` to `dst` (the CopyRect encoding).
    pub fn copy(&mut self, dst: Region, src: Region) -> Result<(), ProbeError> {
        self.check(dst, "copy destination")?;
        self.check(Region { width: dst.width, height: dst.height, ..src }, "copy source")?;

        let row_len = dst.width * BYTES_PER_PIXEL;
        let rows: Vec<usize> = if dst.y > src.y {
            (0..dst.height).rev().collect()
        } else {
            (0..dst.height).collect()
        };
        for row in rows {
            let from = self.offset(src.x, src.y + row);
            let to = self.offset(dst.x, dst.y + row);
            self.pixels.copy_within(from..from + row_len, to);
        }
        self.mark_painted(dst);
        Ok(())
    }

    pub fn snapshot(&self) -> Screenshot {
        Screenshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    fn mark_painted(&mut self, region: Region) {
        for y in region.y..region.y + region.height {
            let row = y * self.width;
            for flag in &mut self.painted[row + region.x..row + region.x + region.width] {
                if !*flag {
                    *flag = true;
                    self.unpainted -= 1;
                }
            }
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * BYTES_PER_PIXEL
    }

    fn check(&self, region: Region, what: &str) -> Result<(), ProbeError> {
        if region.fits(self.width, self.height) {
            Ok(())
        } else {
            Err(ProbeError::framebuffer(format!(
                "{} {:?} outside {}x{} screen",
                what, region, self.width, self.height
            )))
        }
    }
}
