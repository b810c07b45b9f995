// THEORY:
// `HsvRange` is the binarization stage. It turns an HSV frame into a black/white
// mask where white marks the pixels whose hue, saturation and value all fall inside
// an inclusive [min, max] box.
//
// Hue is circular, so a color that straddles red (around 0 / 255 in full-range
// encoding) cannot be described by a single interval. The convention here: when the
// max hue is numerically below the min hue, the hue interval wraps around and
// becomes [0, max.hue] U [min.hue, 255]. Saturation and value never wrap; they are
// applied to both halves of the hue union.

use image::{GrayImage, Luma};

use crate::core_modules::hsv_pixel::hsv_pixel::{HsvImage, HsvPixel};

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub min: HsvPixel,
    pub max: HsvPixel,
}

impl HsvRange {
    pub fn new(min: HsvPixel, max: HsvPixel) -> Self {
        Self { min, max }
    }

    pub fn from_triples(min: [u8; 3], max: [u8; 3]) -> Self {
        Self::new(
            HsvPixel::new(min[0], min[1], min[2]),
            HsvPixel::new(max[0], max[1], max[2]),
        )
    }

    /// True when the hue interval crosses the 255 -> 0 seam.
    pub fn wraps_hue(&self) -> bool {
        self.max.hue < self.min.hue
    }

    pub fn contains(&self, pixel: HsvPixel) -> bool {
        let hue_matches = if self.wraps_hue() {
            pixel.hue <= self.max.hue || pixel.hue >= self.min.hue
        } else {
            (self.min.hue..=self.max.hue).contains(&pixel.hue)
        };

        hue_matches
            && (self.min.saturation..=self.max.saturation).contains(&pixel.saturation)
            && (self.min.value..=self.max.value).contains(&pixel.value)
    }

    /// Binarizes an HSV frame: `MASK_ON` where the pixel is in range, `MASK_OFF` elsewhere.
    pub fn mask(&self, hsv: &HsvImage) -> GrayImage {
        let mut mask = GrayImage::new(hsv.width(), hsv.height());
        for (source, target) in hsv.pixels().zip(mask.pixels_mut()) {
            let [hue, saturation, value] = source.0;
            let on = self.contains(HsvPixel::new(hue, saturation, value));
            *target = Luma([if on { MASK_ON } else { MASK_OFF }]);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn orange() -> HsvRange {
        HsvRange::from_triples([247, 97, 185], [12, 228, 255])
    }

    #[test]
    fn orange_range_wraps() {
        assert!(orange().wraps_hue());
        assert!(!HsvRange::from_triples([20, 0, 0], [40, 255, 255]).wraps_hue());
    }

    #[test]
    fn equal_hues_do_not_wrap() {
        let range = HsvRange::from_triples([30, 0, 0], [30, 255, 255]);
        assert!(!range.wraps_hue());
        assert!(range.contains(HsvPixel::new(30, 10, 10)));
        assert!(!range.contains(HsvPixel::new(31, 10, 10)));
    }

    #[test]
    fn wrapped_range_accepts_both_sides_of_red() {
        let range = orange();
        assert!(range.contains(HsvPixel::new(250, 150, 200)));
        assert!(range.contains(HsvPixel::new(5, 150, 200)));
        assert!(range.contains(HsvPixel::new(0, 150, 200)));
        assert!(range.contains(HsvPixel::new(255, 150, 200)));
        assert!(!range.contains(HsvPixel::new(128, 150, 200)));
        assert!(!range.contains(HsvPixel::new(13, 150, 200)));
    }

    #[test]
    fn saturation_and_value_apply_to_both_halves() {
        let range = orange();
        assert!(!range.contains(HsvPixel::new(250, 50, 200)));
        assert!(!range.contains(HsvPixel::new(5, 150, 100)));
        assert!(!range.contains(HsvPixel::new(5, 240, 200)));
    }

    #[test]
    fn plain_range_is_an_inclusive_box() {
        let range = HsvRange::from_triples([40, 100, 100], [80, 255, 255]);
        assert!(range.contains(HsvPixel::new(40, 100, 100)));
        assert!(range.contains(HsvPixel::new(80, 255, 255)));
        assert!(!range.contains(HsvPixel::new(39, 200, 200)));
        assert!(!range.contains(HsvPixel::new(250, 200, 200)));
    }

    #[test]
    fn mask_marks_matching_pixels_only() {
        let mut hsv = HsvImage::new(4, 1);
        hsv.put_pixel(0, 0, Rgb([250, 150, 200]));
        hsv.put_pixel(1, 0, Rgb([5, 150, 200]));
        hsv.put_pixel(2, 0, Rgb([128, 150, 200]));

        let mask = orange().mask(&hsv);
        let values: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![MASK_ON, MASK_ON, MASK_OFF, MASK_OFF]);
    }

    #[test]
    fn black_frame_yields_empty_mask() {
        let hsv = HsvImage::new(8, 8);
        let mask = orange().mask(&hsv);
        assert!(mask.pixels().all(|p| p.0[0] == MASK_OFF));
    }
}
