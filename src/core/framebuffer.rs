use nalgebra::Vector3;
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// Colour + depth storage at `sample_count`² supersampling.
///
/// Rows are handed out as disjoint mutable slices so a triangle's scanlines
/// can be shaded in parallel without any locking.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,
    color: Vec<Vector3<f32>>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color: vec![Vector3::zeros(); size],
            depth: vec![f32::INFINITY; size],
        }
    }

    pub fn clear(&mut self, color: Vector3<f32>) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Parallel iterator over `(y, color_row, depth_row)` for the given
    /// supersampled rows.
    pub fn rows_mut(
        &mut self,
        rows: RangeInclusive<usize>,
    ) -> impl ParallelIterator<Item = (usize, &mut [Vector3<f32>], &mut [f32])> {
        let width = self.buffer_width;
        let start = *rows.start();
        let count = rows.end().saturating_sub(start) + 1;

        self.color
            .par_chunks_mut(width)
            .zip(self.depth.par_chunks_mut(width))
            .enumerate()
            .skip(start)
            .take(count)
            .map(|(y, (color, depth))| (y, color, depth))
    }

    /// Raw supersampled depth at buffer coordinates.
    #[cfg(test)]
    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.buffer_width && y < self.buffer_height).then(|| self.depth[self.index(x, y)])
    }

    /// Resolved (box-filtered) colour of an output pixel.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }

        if self.sample_count == 1 {
            return Some(self.color[self.index(x, y)]);
        }

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum = Vector3::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum += self.color[self.index(start_x + dx, start_y + dy)];
            }
        }

        Some(sum / (self.sample_count * self.sample_count) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(4, 3, 2);
        fb.clear(Vector3::new(0.2, 0.4, 0.6));
        assert_eq!(fb.get_pixel(3, 2), Some(Vector3::new(0.2, 0.4, 0.6)));
        assert_eq!(fb.depth_at(7, 5), Some(f32::INFINITY));
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn resolve_averages_subsamples() {
        let mut fb = FrameBuffer::new(1, 1, 2);
        fb.rows_mut(0..=0).for_each(|(_, color, _)| {
            color[0] = Vector3::new(1.0, 1.0, 1.0);
        });
        assert_relative_eq!(fb.get_pixel(0, 0).unwrap(), Vector3::repeat(0.25));
    }

    #[test]
    fn rows_mut_yields_only_requested_rows() {
        let mut fb = FrameBuffer::new(2, 4, 1);
        let mut seen: Vec<usize> = fb.rows_mut(1..=2).map(|(y, _, _)| y).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }
}
