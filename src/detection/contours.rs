use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use crate::models::Contour;

/// Outermost borders of the foreground regions in a binary mask
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour { points: c.points })
        .collect()
}

/// Contour enclosing the largest area, if any
pub fn largest_contour(contours: Vec<Contour>) -> Option<Contour> {
    contours
        .into_iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}
