//! Integration tests for the signal color classifier.
//!
//! Tests cover:
//! - Empty regions yielding UNKNOWN
//! - Red-over-yellow priority
//! - The strict pixel-count threshold
//! - Both red hue bands around the hue origin
//! - Injected thresholds

mod common;

use crosswatch::SignalClassifier;
use crosswatch::config::SignalConfig;
use image::{Rgb, RgbImage};

use common::*;

#[test]
fn test_empty_region_is_unknown() {
    let classifier = SignalClassifier::default();

    assert_eq!(classifier.classify(&RgbImage::new(0, 0)), SignalColor::Unknown);
    assert_eq!(classifier.classify(&RgbImage::new(0, 12)), SignalColor::Unknown);
    assert_eq!(classifier.classify(&RgbImage::new(12, 0)), SignalColor::Unknown);
}

#[test]
fn test_red_lamp_is_red() {
    let classifier = SignalClassifier::default();
    let region = solid_image(20, 20, RED_LAMP);

    assert_eq!(classifier.classify(&region), SignalColor::Red);
}

#[test]
fn test_red_takes_priority_over_yellow() {
    let classifier = SignalClassifier::default();

    // 40 red pixels on top, 40 yellow below: both counts exceed 30
    let mut region = solid_image(10, 8, Rgb([0, 0, 0]));
    fill_rect(&mut region, 0, 0, 10, 4, RED_LAMP);
    fill_rect(&mut region, 0, 4, 10, 8, YELLOW_LAMP);

    let counts = classifier.count_colors(&region);
    assert_eq!(counts.red, 40);
    assert_eq!(counts.yellow, 40);
    assert_eq!(classifier.classify(&region), SignalColor::Red);
}

#[test]
fn test_yellow_without_red_is_yellow() {
    let classifier = SignalClassifier::default();
    let mut region = solid_image(10, 10, Rgb([0, 0, 0]));
    fill_rect(&mut region, 0, 0, 10, 4, YELLOW_LAMP);

    assert_eq!(classifier.classify(&region), SignalColor::Yellow);
}

#[test]
fn test_threshold_is_strict() {
    let classifier = SignalClassifier::default();

    // Exactly 30 red pixels is not enough
    let mut region = solid_image(10, 10, Rgb([0, 0, 0]));
    fill_rect(&mut region, 0, 0, 10, 3, RED_LAMP);
    assert_eq!(classifier.count_colors(&region).red, 30);
    assert_eq!(classifier.classify(&region), SignalColor::Green);

    // One more tips it over
    region.put_pixel(0, 5, RED_LAMP);
    assert_eq!(classifier.classify(&region), SignalColor::Red);
}

#[test]
fn test_unlit_or_green_region_is_green() {
    let classifier = SignalClassifier::default();

    assert_eq!(classifier.classify(&solid_image(20, 20, Rgb([0, 0, 0]))), SignalColor::Green);
    assert_eq!(classifier.classify(&solid_image(20, 20, GREEN_LAMP)), SignalColor::Green);
    // Bright but unsaturated
    assert_eq!(classifier.classify(&solid_image(20, 20, PAINT)), SignalColor::Green);
}

#[test]
fn test_dim_red_below_value_floor_is_not_red() {
    let classifier = SignalClassifier::default();
    // V = 50 sits under the red band's value floor of 70
    let region = solid_image(20, 20, Rgb([50, 0, 0]));

    assert_eq!(classifier.count_colors(&region).red, 0);
    assert_eq!(classifier.classify(&region), SignalColor::Green);
}

#[test]
fn test_both_red_hue_bands_count() {
    let classifier = SignalClassifier::default();

    // Hue just past the origin and hue just before wrapping around
    let mut region = solid_image(10, 10, Rgb([0, 0, 0]));
    fill_rect(&mut region, 0, 0, 10, 2, Rgb([255, 30, 0]));
    fill_rect(&mut region, 0, 2, 10, 4, Rgb([255, 0, 40]));

    assert_eq!(classifier.count_colors(&region).red, 40);
    assert_eq!(classifier.classify(&region), SignalColor::Red);
}

#[test]
fn test_injected_threshold() {
    let classifier = SignalClassifier::new(SignalConfig {
        min_pixels: 500,
        ..SignalConfig::default()
    });

    // 400 red pixels is not enough under the raised threshold
    let region = solid_image(20, 20, RED_LAMP);
    assert_eq!(classifier.classify(&region), SignalColor::Green);
}

#[test]
fn test_classification_is_pure() {
    let classifier = SignalClassifier::default();
    let region = solid_image(20, 20, YELLOW_LAMP);

    let first = classifier.classify(&region);
    for _ in 0..3 {
        assert_eq!(classifier.classify(&region), first);
    }
}
