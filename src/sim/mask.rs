//! Per-pixel collision masks
//!
//! A [`Mask`] is a packed bitmap of the opaque pixels of a sprite. Two
//! masks collide when any set bit of one lands on a set bit of the other at
//! their relative integer offset, so transparent corners never register hits.

use glam::{IVec2, Vec2};

const WORD_BITS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Empty (fully transparent) mask
    pub fn new(width: usize, height: usize) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: usize, height: usize) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        mask
    }

    /// Rasterize a shape: a pixel is set when the SDF at its center is <= 0
    pub fn from_sdf<F>(width: usize, height: usize, sdf: F) -> Self
    where
        F: Fn(Vec2) -> f32,
    {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if sdf(center) <= 0.0 {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.words_per_row + x / WORD_BITS;
        let bit = 1u64 << (x % WORD_BITS);
        if on {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Out-of-range pixels read as transparent
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.words_per_row + x / WORD_BITS;
        self.bits[idx] & (1u64 << (x % WORD_BITS)) != 0
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Mirror top-to-bottom (upper obstacles are flipped lower ones)
    pub fn flipped_vertical(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            let src = (self.height - 1 - y) * self.words_per_row;
            let dst = y * self.words_per_row;
            out.bits[dst..dst + self.words_per_row]
                .copy_from_slice(&self.bits[src..src + self.words_per_row]);
        }
        out
    }

    /// First overlapping pixel, in this mask's coordinates
    ///
    /// `offset` is the position of `other`'s top-left corner relative to
    /// this mask's top-left corner. Rows are scanned top to bottom.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let (ox, oy) = (offset.x as i64, offset.y as i64);
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (self.width as i64).min(ox + other.width as i64);
        let y1 = (self.height as i64).min(oy + other.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as usize, y as usize)
                    && other.get((x - ox) as usize, (y - oy) as usize)
                {
                    return Some(IVec2::new(x as i32, y as i32));
                }
            }
        }
        None
    }
}
