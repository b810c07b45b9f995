// THEORY:
// A `ColorTarget` is one thing the robot looks for, described by its color. It
// chains the binarization and spatial grouping stages (`HsvRange::mask` followed by
// `region_finder::find_rects`) and then decides which single region is "the" target
// for this frame.
//
// Selection rules:
// 1.  **Largest Wins**: the rectangle with the largest area is the target. On a tie
//     the first rectangle found is kept.
// 2.  **Noise Floor**: if even the largest rectangle is smaller than `min_area`, the
//     frame has no target. The rectangle is still returned for annotation so the
//     operator can see what was rejected.
//
// The target holds no per-frame state.

use log::debug;

use crate::core_modules::bounding_rect::BoundingRect;
use crate::core_modules::color_range::HsvRange;
use crate::core_modules::hsv_pixel::hsv_pixel::HsvImage;
use crate::core_modules::region_finder::region_finder;

pub const DEFAULT_MIN_AREA: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ColorTarget {
    pub name: String,
    pub range: HsvRange,
    /// Rectangles with a smaller area are treated as noise.
    pub min_area: i64,
}

/// The outcome of looking for one target in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Detection {
    /// The largest rectangle found, whether or not it cleared the noise floor.
    pub largest: Option<BoundingRect>,
    pub region_count: usize,
    pub passes_min_area: bool,
}

impl Detection {
    /// The largest rectangle, only if it is big enough to count as the target.
    pub fn accepted(&self) -> Option<BoundingRect> {
        self.largest.filter(|_| self.passes_min_area)
    }
}

impl ColorTarget {
    pub fn new(name: impl Into<String>, range: HsvRange, min_area: i64) -> Self {
        Self {
            name: name.into(),
            range,
            min_area,
        }
    }

    /// Every region of the frame that falls inside the color range.
    pub fn find_rects(&self, hsv: &HsvImage) -> Vec<BoundingRect> {
        let mask = self.range.mask(hsv);
        region_finder::find_rects(&mask)
    }

    pub fn locate(&self, hsv: &HsvImage) -> Detection {
        let rects = self.find_rects(hsv);
        let largest = select_largest(&rects);
        let passes_min_area = largest.is_some_and(|rect| rect.area() >= self.min_area);

        debug!(
            "{}: {} regions, largest {:?}, passes min area: {}",
            self.name,
            rects.len(),
            largest,
            passes_min_area
        );

        Detection {
            largest,
            region_count: rects.len(),
            passes_min_area,
        }
    }
}

/// The rectangle with the largest area; the earliest one on ties.
pub fn select_largest(rects: &[BoundingRect]) -> Option<BoundingRect> {
    rects.iter().copied().fold(None, |best, rect| match best {
        Some(current) if current.area() >= rect.area() => Some(current),
        _ => Some(rect),
    })
}
