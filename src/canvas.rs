//! Wrapper around the pixel buffer sprites draw into.

use vek::{Extent2, Rect, Vec2};

/// Simple wrapper around a pixel buffer that is passed to every sprite draw call.
///
/// Colors are packed as `0xAARRGGBB`.
pub struct Canvas<'a> {
    /// Size of the canvas in pixels.
    pub(crate) size: Extent2<usize>,
    /// Reference to the pixel buffer.
    pub(crate) buffer: &'a mut [u32],
}

impl<'a> Canvas<'a> {
    /// Set a pixel on the buffer at the coordinate passed.
    ///
    /// If the coordinate is out of bounds nothing will be done.
    #[inline]
    pub fn set_pixel(&mut self, position: Vec2<f64>, color: u32) {
        if position.x < 0.0
            || position.y < 0.0
            || position.x >= self.size.w as f64
            || position.y >= self.size.h as f64
        {
            return;
        }

        let index = position.x as usize + position.y as usize * self.size.w;
        if index < self.buffer.len() {
            self.buffer[index] = color;
        }
    }

    /// Fill a rectangle, clamped to the canvas.
    ///
    /// A rectangle with a negative width or height fills nothing.
    pub fn fill_rect(&mut self, rect: Rect<f64, f64>, color: u32) {
        let start_x = (rect.x.floor().max(0.0) as usize).min(self.size.w);
        let end_x = ((rect.x + rect.w).ceil().max(0.0) as usize).min(self.size.w);
        let start_y = (rect.y.floor().max(0.0) as usize).min(self.size.h);
        let end_y = ((rect.y + rect.h).ceil().max(0.0) as usize).min(self.size.h);

        // An inverted rectangle clamps to nothing
        if end_x <= start_x || end_y <= start_y {
            return;
        }

        for y in start_y..end_y {
            let y_index = y * self.size.w;
            self.buffer[(y_index + start_x)..(y_index + end_x)].fill(color);
        }
    }

    /// Fill the canvas with a single color.
    #[inline]
    pub fn fill(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Get the raw buffer of pixels.
    #[inline]
    pub fn raw_buffer(&mut self) -> &mut [u32] {
        self.buffer
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.w
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.h
    }

    /// Size in pixels.
    #[inline]
    pub fn size(&self) -> Extent2<usize> {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use vek::{Extent2, Rect, Vec2};

    use super::Canvas;

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut buffer = vec![0; 4 * 4];
        let mut canvas = Canvas {
            size: Extent2::new(4, 4),
            buffer: &mut buffer,
        };

        canvas.set_pixel(Vec2::new(-1.0, 0.0), 0xFFFFFFFF);
        canvas.set_pixel(Vec2::new(0.0, 4.0), 0xFFFFFFFF);
        assert!(buffer.iter().all(|pixel| *pixel == 0));
    }

    #[test]
    fn fill_rect_clamps_to_canvas() {
        let mut buffer = vec![0; 4 * 4];
        let mut canvas = Canvas {
            size: Extent2::new(4, 4),
            buffer: &mut buffer,
        };

        // Covers the right half of the canvas, the rest falls outside
        canvas.fill_rect(Rect::new(2.0, -10.0, 100.0, 100.0), 0xFFFF0000);

        let filled = buffer.iter().filter(|pixel| **pixel == 0xFFFF0000).count();
        assert_eq!(filled, 2 * 4);
    }

    #[test]
    fn fill_rect_with_negative_size_fills_nothing() {
        let mut buffer = vec![0; 4 * 4];
        let mut canvas = Canvas {
            size: Extent2::new(4, 4),
            buffer: &mut buffer,
        };

        canvas.fill_rect(Rect::new(5.0, 0.0, -3.0, 2.0), 0xFFFF0000);
        canvas.fill_rect(Rect::new(0.0, 3.0, 2.0, -2.0), 0xFFFF0000);

        assert!(buffer.iter().all(|pixel| *pixel == 0));
    }
}
