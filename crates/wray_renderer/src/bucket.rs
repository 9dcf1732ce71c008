//! Bucket-based tile rendering.
//!
//! Divides the view plane into tiles (buckets) that are rendered
//! independently and in parallel.

/// A rectangular block of pixels.
///
/// Rows are counted from the bottom of the image, as on the view plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// First column of the bucket
    pub col: u32,
    /// First (lowest) row of the bucket
    pub row: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(col: u32, row: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            col,
            row,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// `(row, col)` of every pixel, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Bucket { col, row, width, height, .. } = *self;
        (row..row + height).flat_map(move |r| (col..col + width).map(move |c| (r, c)))
    }

    fn center(&self) -> (f32, f32) {
        (
            self.col as f32 + self.width as f32 / 2.0,
            self.row as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Default bucket edge in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets covering an `hres x vres` view plane, ordered in a
/// spiral from the center outward.
pub fn generate_buckets(hres: u32, vres: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut row = 0;
    while row < vres {
        let mut col = 0;
        while col < hres {
            let width = bucket_size.min(hres - col);
            let height = bucket_size.min(vres - row);
            buckets.push(Bucket::new(col, row, width, height, buckets.len()));
            col += bucket_size;
        }
        row += bucket_size;
    }

    sort_spiral(&mut buckets, hres, vres);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centers from the image center.
fn sort_spiral(buckets: &mut [Bucket], hres: u32, vres: u32) {
    let center_col = hres as f32 / 2.0;
    let center_row = vres as f32 / 2.0;

    let distance = |bucket: &Bucket| {
        let (c, r) = bucket.center();
        (c - center_col).powi(2) + (r - center_row).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_buckets_cover_every_pixel_once() {
        let buckets = generate_buckets(100, 37, 16);

        let pixels: HashSet<(u32, u32)> = buckets.iter().flat_map(|b| b.pixels()).collect();
        let total: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(pixels.len(), 100 * 37);
        assert_eq!(total, 100 * 37);
        assert!(pixels.iter().all(|&(row, col)| row < 37 && col < 100));
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        // First bucket should be the center one
        assert_eq!((buckets[0].col, buckets[0].row), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }
}
