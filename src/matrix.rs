use image::{DynamicImage, GrayImage};
use imageproc::contrast::otsu_level;

/// Packed grid of bits, row-major, `true` meaning dark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    pub fn new(width: usize, height: usize) -> Self {
        let words = (width * height).div_ceil(64);
        Self {
            width,
            height,
            words: vec![0; words],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bit at (x, y); out-of-range reads are light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let mask = 1u64 << (index % 64);
        if value {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
    }

    /// Copy with every bit flipped
    pub fn inverted(&self) -> Self {
        let mut inverted = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                inverted.set(x, y, !self.get(x, y));
            }
        }
        inverted
    }

    /// Number of dark bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Threshold a grayscale image at its Otsu level
///
/// Pixels at or below the level are dark. Returns the matrix and the level used.
pub fn binarize_luma(gray: &GrayImage) -> (BitMatrix, u8) {
    let (width, height) = gray.dimensions();
    let level = otsu_level(gray);
    let mut matrix = BitMatrix::new(width as usize, height as usize);

    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] <= level {
            matrix.set(x as usize, y as usize, true);
        }
    }

    (matrix, level)
}

/// Luma conversion followed by [`binarize_luma`]
pub fn binarize(img: &DynamicImage) -> BitMatrix {
    let gray = img.to_luma8();
    let (matrix, level) = binarize_luma(&gray);
    log::debug!(
        "Binarized {}x{} image at Otsu level {} ({} dark pixels)",
        matrix.width(),
        matrix.height(),
        level,
        matrix.count_ones()
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_set_get_across_word_boundary() {
        let mut m = BitMatrix::new(65, 3);
        m.set(63, 0, true);
        m.set(64, 0, true);
        m.set(0, 1, true);
        assert!(m.get(63, 0));
        assert!(m.get(64, 0));
        assert!(m.get(0, 1));
        assert!(!m.get(1, 1));
        assert_eq!(m.count_ones(), 3);

        m.set(64, 0, false);
        assert!(!m.get(64, 0));
        assert_eq!(m.count_ones(), 2);
    }

    #[test]
    fn test_out_of_range_is_light() {
        let mut m = BitMatrix::new(2, 2);
        m.set(5, 5, true);
        assert!(!m.get(5, 5));
        assert_eq!(m.count_ones(), 0);
    }

    #[test]
    fn test_empty() {
        assert!(BitMatrix::new(0, 10).is_empty());
        assert!(!BitMatrix::new(1, 1).is_empty());
    }

    #[test]
    fn test_inverted() {
        let mut m = BitMatrix::new(3, 3);
        m.set(1, 1, true);
        let inv = m.inverted();
        assert!(!inv.get(1, 1));
        assert_eq!(inv.count_ones(), 8);
    }

    #[test]
    fn test_binarize_two_tone() {
        let mut gray = GrayImage::from_pixel(8, 4, Luma([230]));
        for y in 0..4 {
            for x in 0..4 {
                gray.put_pixel(x, y, Luma([20]));
            }
        }
        let (m, level) = binarize_luma(&gray);
        assert!(level >= 20 && level < 230);
        assert!(m.get(0, 0));
        assert!(m.get(3, 3));
        assert!(!m.get(4, 0));
        assert_eq!(m.count_ones(), 16);
    }
}
