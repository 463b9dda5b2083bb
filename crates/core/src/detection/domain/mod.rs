pub mod contours;
pub mod difference_map;
pub mod motion_detector;
