use crosswatch::{BoundingBox, DetectedObject, ZonePolygon};
use image::{Rgb, RgbImage};

pub const FRAME_WIDTH: u32 = 400;
pub const FRAME_HEIGHT: u32 = 300;

/// COCO class ids used by the default configuration
pub const CAR: u32 = 2;
pub const PERSON: u32 = 0;
pub const TRAFFIC_LIGHT: u32 = 9;

pub const ROAD: Rgb<u8> = Rgb([40, 40, 40]);
pub const PAINT: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED_LAMP: Rgb<u8> = Rgb([255, 0, 0]);
pub const YELLOW_LAMP: Rgb<u8> = Rgb([255, 255, 0]);
pub const GREEN_LAMP: Rgb<u8> = Rgb([0, 255, 0]);

/// Box around the lamp painted by `with_lamp`
pub const LAMP_BOX: BoundingBox = BoundingBox {
    x1: 10,
    y1: 10,
    x2: 50,
    y2: 50,
};

/// A point well inside the painted crossing
pub const CROSSING_CENTRE: (i32, i32) = (190, 230);

pub fn solid_image(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

pub fn fill_rect(img: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgb<u8>) {
    for y in y1..y2.min(img.height()) {
        for x in x1..x2.min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Dark road with seven white stripes, 20px wide and 20px apart, spanning
/// x 60..320 and y 200..260 of a 400x300 frame.
pub fn crossing_frame() -> RgbImage {
    let mut frame = solid_image(FRAME_WIDTH, FRAME_HEIGHT, ROAD);
    for k in 0..7 {
        let x0 = 60 + 40 * k;
        fill_rect(&mut frame, x0, 200, x0 + 20, 260, PAINT);
    }
    frame
}

/// Crossing frame with a lit lamp inside `LAMP_BOX`
pub fn crossing_frame_with_lamp(color: Rgb<u8>) -> RgbImage {
    let mut frame = crossing_frame();
    with_lamp(&mut frame, color);
    frame
}

pub fn with_lamp(frame: &mut RgbImage, color: Rgb<u8>) {
    fill_rect(frame, 15, 15, 45, 45, color);
}

pub fn car(id: u32, bbox: BoundingBox) -> DetectedObject {
    DetectedObject::new(id, CAR, bbox)
}

pub fn traffic_light(id: u32, bbox: BoundingBox) -> DetectedObject {
    DetectedObject::new(id, TRAFFIC_LIGHT, bbox)
}

/// Square test zone used by the state machine tests
pub fn test_zone() -> ZonePolygon {
    ZonePolygon::from_rect(100, 100, 200, 200)
}

/// Box whose ground point (bottom centre) lies inside `test_zone`
pub fn box_inside() -> BoundingBox {
    BoundingBox::new(130, 110, 170, 150)
}

/// Box whose ground point lies above `test_zone`
pub fn box_outside() -> BoundingBox {
    BoundingBox::new(130, 20, 170, 60)
}
