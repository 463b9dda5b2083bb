use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;

use crate::shared::region::MotionRegion;

/// Finds the external boundaries of every connected foreground blob.
///
/// Holes and blobs nested inside holes are ignored; only outermost borders
/// produce a region. Each region carries its axis-aligned bounding box and the
/// polygon area enclosed by the traced boundary.
pub fn extract_regions(mask: &GrayImage) -> Vec<MotionRegion> {
    // Tracing misclassifies blobs on column 0 as holes; a zero border keeps
    // every real blob off the edge.
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .iter()
        .filter(|c| is_external(c))
        .filter_map(|c| region_for(&c.points))
        .map(|r| MotionRegion {
            x: r.x - 1,
            y: r.y - 1,
            ..r
        })
        .collect()
}

fn is_external(contour: &Contour<i32>) -> bool {
    contour.border_type == BorderType::Outer && contour.parent.is_none()
}

fn region_for(points: &[Point<i32>]) -> Option<MotionRegion> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(MotionRegion {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
        area: polygon_area(points),
    })
}

/// Shoelace area of a closed polygon. Degenerate outlines give 0.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}
