use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::PathBuf;
use tracing::debug;
use crate::detection::FrameReport;
use crate::models::{BoundingBox, SignalColor, ZonePolygon};

const CAUGHT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const TRACKED_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const ZONE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const SWATCH_SIZE: u32 = 40;

/// Consumer of per-frame results: boxes with caught flags, signal, violator count
pub trait RenderSink {
    fn render(&mut self, frame: &RgbImage, report: &FrameReport) -> Result<()>;
}

/// Writes every frame as a PNG with boxes, zone outline and a signal swatch
pub struct AnnotatedFrameWriter {
    output_dir: PathBuf,
}

impl AnnotatedFrameWriter {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        crate::pipeline::prepare_output_dir(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn frame_path(&self, frame_index: u64) -> PathBuf {
        self.output_dir.join(format!("frame_{:06}.png", frame_index))
    }
}

impl RenderSink for AnnotatedFrameWriter {
    fn render(&mut self, frame: &RgbImage, report: &FrameReport) -> Result<()> {
        let annotated = annotate(frame, report);
        let path = self.frame_path(report.frame_index);
        annotated
            .save(&path)
            .with_context(|| format!("Failed to save annotated frame {}", path.display()))?;
        Ok(())
    }
}

/// Draw the engine's view of a frame onto a copy of it
pub fn annotate(frame: &RgbImage, report: &FrameReport) -> RgbImage {
    let mut canvas = frame.clone();

    if let Some(zone) = &report.zone {
        draw_zone(&mut canvas, zone);
    }

    for object in &report.objects {
        let color = if object.is_caught() {
            CAUGHT_COLOR
        } else {
            TRACKED_COLOR
        };
        draw_box(&mut canvas, &object.bbox, color);
    }

    let swatch = SWATCH_SIZE.min(canvas.width()).min(canvas.height());
    if swatch > 0 {
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(0, 0).of_size(swatch, swatch),
            signal_color(report.signal),
        );
    }

    canvas
}

fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    // Pull far-off edges in to just outside the canvas so they stay hidden
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let clamp_x = |v: i32| v.clamp(-2, width + 2);
    let clamp_y = |v: i32| v.clamp(-2, height + 2);
    let bbox = BoundingBox::new(
        clamp_x(bbox.x1),
        clamp_y(bbox.y1),
        clamp_x(bbox.x2),
        clamp_y(bbox.y2),
    );

    // Two nested outlines for a 2px border
    for inset in 0..2 {
        let w = bbox.width() - 2 * inset;
        let h = bbox.height() - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(bbox.x1 + inset, bbox.y1 + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_zone(canvas: &mut RgbImage, zone: &ZonePolygon) {
    let corners = zone.corners;
    for i in 0..corners.len() {
        let (ax, ay) = corners[i];
        let (bx, by) = corners[(i + 1) % corners.len()];
        draw_line_segment_mut(
            canvas,
            (ax as f32, ay as f32),
            (bx as f32, by as f32),
            ZONE_COLOR,
        );
    }
}

fn signal_color(signal: SignalColor) -> Rgb<u8> {
    match signal {
        SignalColor::Red => Rgb([255, 0, 0]),
        SignalColor::Yellow => Rgb([255, 200, 0]),
        SignalColor::Green => Rgb([0, 200, 0]),
        SignalColor::Unknown => Rgb([128, 128, 128]),
    }
}

/// Emits one debug line per frame with every vehicle's id label
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// `ID:<id>` per vehicle, with `CAUGHT!` appended for violators
    pub fn labels(report: &FrameReport) -> Vec<String> {
        report
            .objects
            .iter()
            .map(|o| {
                if o.is_caught() {
                    format!("ID:{} CAUGHT!", o.id)
                } else {
                    format!("ID:{}", o.id)
                }
            })
            .collect()
    }
}

impl RenderSink for LogSink {
    fn render(&mut self, _frame: &RgbImage, report: &FrameReport) -> Result<()> {
        debug!(
            "Frame {}: signal={} zone={} vehicles=[{}] total_violators={}",
            report.frame_index,
            report.signal,
            if report.zone.is_some() { "found" } else { "none" },
            Self::labels(report).join(", "),
            report.violator_count
        );

        Ok(())
    }
}
