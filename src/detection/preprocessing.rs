use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{self, ThresholdType};
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

/// Convert frame to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Binary threshold: strictly brighter than `level` becomes 255, the rest 0
pub fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    contrast::threshold(img, level, ThresholdType::Binary)
}

/// Morphological closing with a `width` x `height` rectangle anchored at its centre.
///
/// A rectangle is the Minkowski sum of a horizontal and a vertical line, so the
/// closing runs as two line dilations followed by two line erosions instead of
/// one pass with the full rectangle.
pub fn close_rect(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    let horizontal = line_mask(width, 1);
    let vertical = line_mask(1, height);

    let dilated = grayscale_dilate(&grayscale_dilate(img, &horizontal), &vertical);
    grayscale_erode(&grayscale_erode(&dilated, &horizontal), &vertical)
}

fn line_mask(width: u32, height: u32) -> Mask {
    let shape = GrayImage::from_pixel(width, height, Luma([255u8]));
    Mask::from_image(&shape, (width / 2) as u8, (height / 2) as u8)
}

/// Crop the rows from `start_fraction * height` to the bottom.
/// Returns the crop and the row offset it starts at.
pub fn lower_region(img: &GrayImage, start_fraction: f32) -> (GrayImage, u32) {
    let (width, height) = img.dimensions();
    let offset = ((height as f32 * start_fraction).floor() as u32).min(height);
    let cropped = image::imageops::crop_imm(img, 0, offset, width, height - offset).to_image();
    (cropped, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binarize_is_strictly_above_level() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[149u8, 150, 151][x as usize]]));
        let mask = binarize(&img, 150);
        assert_eq!(mask.as_raw(), &vec![0, 0, 255]);
    }
}
