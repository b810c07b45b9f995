pub mod bounding_rect;
pub mod color_range;
pub mod color_target;
pub mod hsv_pixel;
pub mod optical_frame;
pub mod region_finder;
