/// Label images for die faces: the generator interface, a memoizing cache,
/// and a small built-in rasterizer
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// How a face value is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelStyle {
    #[default]
    Number,
    /// Pips for 1 through 6; other values fall back to digits
    Dots,
}

/// Pip centres for values 1..=6, in normalized image coordinates (y down)
pub fn pip_layout(value: u32) -> Option<&'static [(f32, f32)]> {
    const LO: f32 = 0.25;
    const MID: f32 = 0.5;
    const HI: f32 = 0.75;
    let layout: &'static [(f32, f32)] = match value {
        1 => &[(MID, MID)],
        2 => &[(LO, LO), (HI, HI)],
        3 => &[(LO, LO), (MID, MID), (HI, HI)],
        4 => &[(LO, LO), (HI, LO), (LO, HI), (HI, HI)],
        5 => &[(LO, LO), (HI, LO), (LO, HI), (HI, HI), (MID, MID)],
        6 => &[(LO, LO), (LO, MID), (LO, HI), (HI, LO), (HI, MID), (HI, HI)],
        _ => return None,
    };
    Some(layout)
}

/// Produces the image shown on a face for a given value and style.
///
/// Rasterization is up to the implementor; the engine only asks for images
/// and hands them back through the die's label placements.
pub trait LabelImageGenerator {
    type Image;

    fn generate(&mut self, value: u32, style: LabelStyle) -> Self::Image;
}

/// Memoizes label images so each `(value, style)` is generated at most once
pub struct LabelCache<G: LabelImageGenerator> {
    generator: G,
    images: HashMap<(u32, LabelStyle), Rc<G::Image>>,
}

impl<G: LabelImageGenerator> LabelCache<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            images: HashMap::new(),
        }
    }

    /// Cached image for `value` in `style`, generating it on first use
    pub fn get(&mut self, value: u32, style: LabelStyle) -> Rc<G::Image> {
        let generator = &mut self.generator;
        self.images
            .entry((value, style))
            .or_insert_with(|| Rc::new(generator.generate(value, style)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop every cached image. Dice still holding an image keep it alive.
    pub fn release_all(&mut self) {
        debug!("releasing {} label images", self.images.len());
        self.images.clear();
    }
}

/// Square 8-bit grayscale image, row-major, 0 = background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBitmap {
    pub size: usize,
    pub pixels: Vec<u8>,
}

impl LabelBitmap {
    fn blank(size: usize) -> Self {
        Self {
            size,
            pixels: vec![0; size * size],
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the image
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels.get(y * self.size + x).copied()
    }

    fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize) {
        for y in y0..(y0 + h).min(self.size) {
            for x in x0..(x0 + w).min(self.size) {
                self.pixels[y * self.size + x] = 255;
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        for y in 0..self.size {
            for x in 0..self.size {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.pixels[y * self.size + x] = 255;
                }
            }
        }
    }
}

/// 3x5 pixel glyphs for 0-9, one row per entry, high bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const PIP_RADIUS: f32 = 0.09;
/// Share of the image the digit block may cover
const GLYPH_FILL: f32 = 0.6;

/// Built-in generator drawing digits with a pixel font and pips as discs
#[derive(Debug, Clone, Copy)]
pub struct RasterLabelGenerator {
    pub size: usize,
}

impl RasterLabelGenerator {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    fn draw_pips(&self, layout: &[(f32, f32)]) -> LabelBitmap {
        let mut bitmap = LabelBitmap::blank(self.size);
        let scale = self.size as f32;
        for &(x, y) in layout {
            bitmap.fill_circle(x * scale, y * scale, PIP_RADIUS * scale);
        }
        bitmap
    }

    fn draw_digits(&self, value: u32) -> LabelBitmap {
        let mut bitmap = LabelBitmap::blank(self.size);
        let digits: Vec<usize> = value
            .to_string()
            .bytes()
            .map(|b| (b - b'0') as usize)
            .collect();
        // 6 and 9 read the same upside down, so they get an underline
        let underline = value == 6 || value == 9;

        let cols = digits.len() * 4 - 1;
        let rows = if underline { 7 } else { 5 };
        let cell = ((self.size as f32 * GLYPH_FILL) / cols.max(rows) as f32).floor().max(1.0) as usize;
        let left = self.size.saturating_sub(cols * cell) / 2;
        let top = self.size.saturating_sub(rows * cell) / 2;

        for (i, &digit) in digits.iter().enumerate() {
            for (row, bits) in DIGITS[digit].iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) != 0 {
                        let x = left + (i * 4 + col) * cell;
                        bitmap.fill_rect(x, top + row * cell, cell, cell);
                    }
                }
            }
        }
        if underline {
            bitmap.fill_rect(left, top + 6 * cell, cols * cell, cell);
        }
        bitmap
    }
}

impl Default for RasterLabelGenerator {
    fn default() -> Self {
        Self::new(64)
    }
}

impl LabelImageGenerator for RasterLabelGenerator {
    type Image = LabelBitmap;

    fn generate(&mut self, value: u32, style: LabelStyle) -> LabelBitmap {
        match (style, pip_layout(value)) {
            (LabelStyle::Dots, Some(layout)) => self.draw_pips(layout),
            _ => self.draw_digits(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        calls: usize,
    }

    impl LabelImageGenerator for Counting {
        type Image = (u32, LabelStyle);

        fn generate(&mut self, value: u32, style: LabelStyle) -> Self::Image {
            self.calls += 1;
            (value, style)
        }
    }

    #[test]
    fn test_pip_layouts() {
        for value in 1..=6 {
            assert_eq!(pip_layout(value).unwrap().len(), value as usize);
        }
        assert_eq!(pip_layout(1), Some(&[(0.5, 0.5)][..]));
        assert_eq!(pip_layout(2), Some(&[(0.25, 0.25), (0.75, 0.75)][..]));
        let five = pip_layout(5).unwrap();
        assert_eq!(&five[..4], pip_layout(4).unwrap());
        assert!(five.contains(&(0.5, 0.5)));
        let six = pip_layout(6).unwrap();
        assert!(six.iter().all(|&(x, _)| x == 0.25 || x == 0.75));
        assert_eq!(pip_layout(0), None);
        assert_eq!(pip_layout(7), None);
    }

    #[test]
    fn test_cache_generates_once_per_key() {
        let mut cache = LabelCache::new(Counting { calls: 0 });
        let a = cache.get(3, LabelStyle::Number);
        let b = cache.get(3, LabelStyle::Number);
        cache.get(3, LabelStyle::Dots);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.generator.calls, 2);
    }

    #[test]
    fn test_release_all_empties_cache() {
        let mut cache = LabelCache::new(Counting { calls: 0 });
        let kept = cache.get(1, LabelStyle::Number);
        cache.release_all();
        assert!(cache.is_empty());
        assert_eq!(*kept, (1, LabelStyle::Number));
        cache.get(1, LabelStyle::Number);
        assert_eq!(cache.generator.calls, 2);
    }

    #[test]
    fn test_raster_pips_centre_dot() {
        let mut generator = RasterLabelGenerator::new(32);
        let one = generator.generate(1, LabelStyle::Dots);
        assert_eq!(one.pixels.len(), 32 * 32);
        assert_eq!(one.get(16, 16), Some(255));
        assert_eq!(one.get(8, 8), Some(0));
        let two = generator.generate(2, LabelStyle::Dots);
        assert_eq!(two.get(8, 8), Some(255));
        assert_eq!(two.get(16, 16), Some(0));
    }

    #[test]
    fn test_bitmap_get_outside_image() {
        let bitmap = RasterLabelGenerator::new(8).generate(1, LabelStyle::Dots);
        assert_eq!(bitmap.get(7, 7), Some(0));
        assert_eq!(bitmap.get(8, 0), None);
        assert_eq!(bitmap.get(0, 8), None);
    }

    #[test]
    fn test_raster_digits() {
        let mut generator = RasterLabelGenerator::new(32);
        let twelve = generator.generate(12, LabelStyle::Number);
        assert!(twelve.pixels.iter().any(|&p| p == 255));
        // Dots style has no layout for 12 and falls back to digits
        assert_eq!(generator.generate(12, LabelStyle::Dots), twelve);
        let nine = generator.generate(9, LabelStyle::Number);
        let six = generator.generate(6, LabelStyle::Number);
        assert_ne!(nine, six);
    }
}
