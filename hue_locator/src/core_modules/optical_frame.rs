// THEORY:
// The locator reports positions for an omnidirectional mirror, whose optical axis
// sits near the middle of a square sensor window rather than at the top-left of the
// image. `OpticalFrame` moves a rectangle's center from crop pixel coordinates into
// that axis-centered frame: subtract half the sensor size, then add the calibrated
// offset of the axis from the window center.

use crate::core_modules::bounding_rect::BoundingRect;

pub const DEFAULT_SENSOR_SIZE: u32 = 720;

/// A detected target in axis-centered coordinates. Width/height stay in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPosition {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalFrame {
    /// Side of the square sensor window in pixels.
    pub sensor_size: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for OpticalFrame {
    fn default() -> Self {
        Self {
            sensor_size: DEFAULT_SENSOR_SIZE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl OpticalFrame {
    pub fn new(sensor_size: u32, offset_x: f64, offset_y: f64) -> Self {
        Self {
            sensor_size,
            offset_x,
            offset_y,
        }
    }

    /// Recenters the rectangle's center. Coordinates truncate toward zero.
    pub fn to_position(&self, rect: &BoundingRect) -> TargetPosition {
        let half_sensor = self.sensor_size as f64 / 2.0;
        let (center_x, center_y) = rect.center();
        TargetPosition {
            x: (center_x - half_sensor + self.offset_x) as i32,
            y: (center_y - half_sensor + self.offset_y) as i32,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_center_maps_to_origin() {
        let frame = OpticalFrame::default();
        let position = frame.to_position(&BoundingRect::new(350, 350, 20, 20));
        assert_eq!(
            position,
            TargetPosition {
                x: 0,
                y: 0,
                width: 20,
                height: 20
            }
        );
    }

    #[test]
    fn offset_shifts_the_origin() {
        let frame = OpticalFrame::new(720, 12.0, -8.0);
        let position = frame.to_position(&BoundingRect::new(350, 350, 20, 20));
        assert_eq!((position.x, position.y), (12, -8));
    }

    #[test]
    fn half_pixels_truncate_toward_zero() {
        let frame = OpticalFrame::default();
        // Centers at 10.5 and 709.5 -> -349.5 and 349.5.
        let top_left = frame.to_position(&BoundingRect::new(10, 10, 1, 1));
        let bottom_right = frame.to_position(&BoundingRect::new(709, 709, 1, 1));
        assert_eq!((top_left.x, top_left.y), (-349, -349));
        assert_eq!((bottom_right.x, bottom_right.y), (349, 349));
    }
}
