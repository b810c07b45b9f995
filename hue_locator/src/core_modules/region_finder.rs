// THEORY:
// The `region_finder` is the spatial grouping stage. It takes the binary mask from
// `HsvRange` and turns every connected white region into a `BoundingRect`.
//
// Algorithm steps (all delegated to `imageproc`):
// 1.  **Border Following**: the mask is framed with a one-pixel background border,
//     then `find_contours` traces it. Without the frame, a region touching the
//     image edge is reported as a hole and lost. Only outer borders are kept; hole
//     borders sit inside an outer one. Points are shifted back by the frame width.
// 2.  **Convex Hull**: each outer border is closed over with its convex hull, which
//     repairs notches and ragged edges left by thresholding.
// 3.  **Bounding Box**: the hull is enclosed in an axis-aligned rectangle.
//
// The finder is stateless: one mask in, one list of rectangles out.

pub mod region_finder {
    use image::{GrayImage, imageops};
    use imageproc::contours::{BorderType, find_contours};
    use imageproc::geometry::convex_hull;
    use imageproc::point::Point;

    use crate::core_modules::bounding_rect::BoundingRect;

    /// Finds one bounding rectangle per connected region of the mask.
    pub fn find_rects(mask: &GrayImage) -> Vec<BoundingRect> {
        find_contours::<i32>(&framed(mask))
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer)
            .filter_map(|contour| {
                let points: Vec<Point<i32>> = contour
                    .points
                    .iter()
                    .map(|point| Point::new(point.x - FRAME, point.y - FRAME))
                    .collect();
                hull_rect(&points)
            })
            .collect()
    }

    /// Width of the background border added around the mask.
    const FRAME: i32 = 1;

    /// Copies the mask into a larger, all-background image so no region touches the edge.
    fn framed(mask: &GrayImage) -> GrayImage {
        let border = FRAME as u32 * 2;
        let mut framed = GrayImage::new(mask.width() + border, mask.height() + border);
        imageops::replace(&mut framed, mask, FRAME as i64, FRAME as i64);
        framed
    }

    fn hull_rect(points: &[Point<i32>]) -> Option<BoundingRect> {
        // Hulls of one or two points are the points themselves.
        if points.len() < 3 {
            return BoundingRect::from_points(points);
        }
        let hull = convex_hull(points);
        BoundingRect::from_points(&hull)
    }
}

#[cfg(test)]
mod tests {
    use super::region_finder::*;
    use crate::core_modules::bounding_rect::BoundingRect;
    use image::{GrayImage, Luma};

    fn fill(mask: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
        for py in y..y + height {
            for px in x..x + width {
                mask.put_pixel(px, py, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let mask = GrayImage::new(16, 16);
        assert!(find_rects(&mask).is_empty());
    }

    #[test]
    fn separate_regions_get_separate_rects() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 2, 3, 5, 4);
        fill(&mut mask, 20, 20, 10, 12);

        let mut rects = find_rects(&mask);
        rects.sort_by_key(|rect| rect.x);
        assert_eq!(
            rects,
            vec![BoundingRect::new(2, 3, 5, 4), BoundingRect::new(20, 20, 10, 12)]
        );
    }

    #[test]
    fn single_pixel_region_is_found() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(6, 2, Luma([255]));
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(6, 2, 1, 1)]);
    }

    #[test]
    fn concave_region_is_enclosed_by_its_hull() {
        // An L shape: vertical bar plus a foot to the right.
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 5, 5, 3, 15);
        fill(&mut mask, 5, 17, 12, 3);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(5, 5, 12, 15)]);
    }

    #[test]
    fn regions_touching_each_edge_are_found() {
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 0, 5, 5, 5);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(0, 5, 5, 5)]);

        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 15, 5, 5, 5);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(15, 5, 5, 5)]);

        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 5, 0, 5, 5);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(5, 0, 5, 5)]);

        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 5, 15, 5, 5);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(5, 15, 5, 5)]);
    }

    #[test]
    fn region_in_corner_is_found() {
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 0, 0, 3, 4);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(0, 0, 3, 4)]);
    }

    #[test]
    fn fully_set_mask_is_one_region() {
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 0, 0, 20, 20);
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(0, 0, 20, 20)]);
    }

    #[test]
    fn holes_do_not_produce_rects() {
        let mut mask = GrayImage::new(30, 30);
        fill(&mut mask, 5, 5, 20, 20);
        for py in 10..20 {
            for px in 10..20 {
                mask.put_pixel(px, py, Luma([0]));
            }
        }
        assert_eq!(find_rects(&mask), vec![BoundingRect::new(5, 5, 20, 20)]);
    }
}
