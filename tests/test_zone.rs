//! Integration tests for the crossing zone locator.
//!
//! Tests cover:
//! - Merging separate stripes into a single zone
//! - Offsetting the polygon back into full-frame coordinates
//! - Rejecting frames with no bright region, tiny regions, or regions above the search area
//! - Determinism across calls

mod common;

use crosswatch::ZoneLocator;
use crosswatch::config::ZoneConfig;

use common::*;

fn assert_near(actual: i32, expected: i32, what: &str) {
    assert!(
        (actual - expected).abs() <= 3,
        "{} was {}, expected about {}",
        what,
        actual,
        expected
    );
}

#[test]
fn test_stripes_merge_into_one_zone() {
    let locator = ZoneLocator::default();
    let frame = crossing_frame();

    let zone = locator.locate(&frame).expect("crossing should be found");

    // 1. The zone spans all seven stripes, in full-frame coordinates
    let (x1, y1, x2, y2) = zone.bounds();
    assert_near(x1, 60, "left edge");
    assert_near(x2, 319, "right edge");
    assert_near(y1, 200, "top edge");
    assert_near(y2, 259, "bottom edge");

    // 2. Gaps between stripes are part of the zone
    assert!(zone.contains(CROSSING_CENTRE));
    assert!(zone.contains((90, 230)), "gap between first two stripes");

    // 3. Road above and below is not
    assert!(!zone.contains((190, 180)));
    assert!(!zone.contains((190, 280)));
}

#[test]
fn test_zone_lies_in_lower_half() {
    let locator = ZoneLocator::default();
    let zone = locator.locate(&crossing_frame()).expect("crossing should be found");

    assert!(zone.top() >= (FRAME_HEIGHT / 2) as i32);
}

#[test]
fn test_dark_frame_has_no_zone() {
    let locator = ZoneLocator::default();
    let frame = solid_image(FRAME_WIDTH, FRAME_HEIGHT, ROAD);

    assert!(locator.locate(&frame).is_none());
}

#[test]
fn test_small_bright_patch_is_rejected() {
    let locator = ZoneLocator::default();
    let mut frame = solid_image(FRAME_WIDTH, FRAME_HEIGHT, ROAD);
    // 20x20 patch encloses far less than 1000 px²
    fill_rect(&mut frame, 190, 220, 210, 240, PAINT);

    let trace = locator.trace(&frame);
    assert!(trace.best_area.is_some_and(|area| area < 1000.0));
    assert!(trace.polygon.is_none());
}

#[test]
fn test_bright_region_above_search_area_is_ignored() {
    let locator = ZoneLocator::default();
    let mut frame = solid_image(FRAME_WIDTH, FRAME_HEIGHT, ROAD);
    fill_rect(&mut frame, 40, 20, 360, 100, PAINT);

    assert!(locator.locate(&frame).is_none());
}

#[test]
fn test_min_area_is_configurable() {
    let mut frame = solid_image(FRAME_WIDTH, FRAME_HEIGHT, ROAD);
    fill_rect(&mut frame, 190, 220, 210, 240, PAINT);

    let locator = ZoneLocator::new(ZoneConfig {
        min_area: 100.0,
        ..ZoneConfig::default()
    });

    let zone = locator.locate(&frame).expect("patch passes the lowered area floor");
    assert!(zone.contains((200, 230)));
}

#[test]
fn test_largest_region_wins() {
    let locator = ZoneLocator::default();
    let mut frame = crossing_frame();
    // A second, smaller block that still passes the area floor on its own,
    // far enough above the stripes that closing keeps them apart
    fill_rect(&mut frame, 330, 150, 395, 170, PAINT);

    let zone = locator.locate(&frame).expect("crossing should be found");
    assert!(zone.contains(CROSSING_CENTRE));
    assert!(!zone.contains((360, 160)));
}

#[test]
fn test_locate_is_deterministic() {
    let locator = ZoneLocator::default();
    let frame = crossing_frame();

    let first = locator.locate(&frame);
    let second = locator.locate(&frame);
    assert_eq!(first, second);
}

#[test]
fn test_trace_exposes_search_region() {
    let locator = ZoneLocator::default();
    let trace = locator.trace(&crossing_frame());

    assert_eq!(trace.region_offset, FRAME_HEIGHT / 2);
    assert_eq!(trace.region.height(), FRAME_HEIGHT / 2);
    assert_eq!(trace.gray.dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
    // Closing filled the gap between the first two stripes
    assert_eq!(trace.binary.get_pixel(90, 230)[0], 0);
    assert_eq!(trace.closed.get_pixel(90, 230)[0], 255);
}
