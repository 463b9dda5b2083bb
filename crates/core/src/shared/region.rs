/// An axis-aligned motion rectangle plus the area of the contour it bounds.
///
/// Coordinates are in canonical (preprocessed) resolution unless the
/// region has been passed through [`MotionRegion::scaled`].
#[derive(Clone, Debug, PartialEq)]
pub struct MotionRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub area: f64,
}

impl MotionRegion {
    /// True when the contour area is strictly above `min_area`.
    pub fn exceeds(&self, min_area: f64) -> bool {
        self.area > min_area
    }

    /// Maps the rectangle from a `from` resolution onto a `to` resolution.
    ///
    /// The contour area is left in source units; only the drawable
    /// geometry moves.
    pub fn scaled(&self, from: (u32, u32), to: (u32, u32)) -> MotionRegion {
        if from == to || from.0 == 0 || from.1 == 0 {
            return self.clone();
        }
        let sx = to.0 as f64 / from.0 as f64;
        let sy = to.1 as f64 / from.1 as f64;
        let x0 = (self.x as f64 * sx).round() as i32;
        let y0 = (self.y as f64 * sy).round() as i32;
        let x1 = ((self.x + self.width) as f64 * sx).round() as i32;
        let y1 = ((self.y + self.height) as f64 * sy).round() as i32;
        MotionRegion {
            x: x0,
            y: y0,
            width: (x1 - x0).max(1),
            height: (y1 - y0).max(1),
            area: self.area,
        }
    }

    /// Keeps only regions whose area exceeds `min_area`, preserving order.
    pub fn retain_significant(regions: Vec<MotionRegion>, min_area: f64) -> Vec<MotionRegion> {
        regions.into_iter().filter(|r| r.exceeds(min_area)).collect()
    }
}
