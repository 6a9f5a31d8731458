//! Trend graph rendering.
//!
//! Draws AQI over the history window on a transparent canvas so the widget
//! background shows through: white frame, ticks and axis labels, a faint
//! dashed grid, the AQI line and a legend with the location name.

use std::convert::Infallible;
use std::io::Cursor;

use anyhow::{Context, Result};
use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{ImageFormat, RgbaImage};
use profont::PROFONT_9_POINT;

use airgauge_core::Window;
use airgauge_types::{HistoryEntry, Rgba};

const WHITE: Rgb888 = Rgb888::new(255, 255, 255);
const BLACK: Rgb888 = Rgb888::new(0, 0, 0);
const FRAME_ALPHA: u8 = 230;
const GRID_ALPHA: u8 = 38;
const LEGEND_ALPHA: u8 = 200;

const MARGIN_LEFT: i32 = 34;
const MARGIN_RIGHT: i32 = 10;
const MARGIN_TOP: i32 = 16;
const MARGIN_BOTTOM: i32 = 30;
const DASH: i32 = 4;
const LINE_WIDTH: u32 = 2;
/// Horizontal grid spacing, matching the category breaks.
const AQI_STEP: u16 = 50;

/// Canvas size, line colour and legend label for one graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle<'a> {
    pub width: u32,
    pub height: u32,
    pub line: Rgba,
    pub label: &'a str,
}

/// Render a location's history within `window` as PNG bytes.
///
/// Returns `None` when there is nothing to plot.
pub fn render(
    entries: &[HistoryEntry],
    window: &Window,
    style: &GraphStyle<'_>,
) -> Result<Option<Vec<u8>>> {
    let points = window.points(entries);
    if points.is_empty() {
        return Ok(None);
    }
    let image = plot(&points, window.hours(), style);
    encode_png(&image).map(Some)
}

/// Encode an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(buf)
}

/// RGBA image as an embedded-graphics draw target.
///
/// Colours carry no alpha, so every drawing call paints with the canvas's
/// current `alpha`.
pub struct Canvas {
    image: RgbaImage,
    alpha: u8,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            alpha: u8::MAX,
        }
    }

    /// Set the alpha used by subsequent drawing.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < width && y < height {
                self.image.put_pixel(
                    x,
                    y,
                    image::Rgba([color.r(), color.g(), color.b(), self.alpha]),
                );
            }
        }
        Ok(())
    }
}

/// Plot area in pixel coordinates.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    hours: f64,
    y_max: u16,
}

impl Frame {
    fn x(&self, hours: f64) -> i32 {
        let t = (hours / self.hours).clamp(0.0, 1.0);
        self.left + (t * f64::from(self.right - self.left)).round() as i32
    }

    fn y(&self, aqi: f64) -> i32 {
        let t = (aqi / f64::from(self.y_max)).clamp(0.0, 1.0);
        self.bottom - (t * f64::from(self.bottom - self.top)).round() as i32
    }

    /// Hour marks along the x axis, including both ends.
    fn hour_ticks(&self) -> Vec<f64> {
        let step = (self.hours / 4.0).ceil().max(1.0);
        let mut ticks = Vec::new();
        let mut h = 0.0;
        while h <= self.hours {
            ticks.push(h);
            h += step;
        }
        ticks
    }
}

fn rgb(color: Rgba) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// Draw `(hours, aqi)` points over `[0, hours]` into a new image.
pub fn plot(points: &[(f64, u16)], hours: f64, style: &GraphStyle<'_>) -> RgbaImage {
    let mut canvas = Canvas::new(style.width, style.height);
    let right = i32::try_from(style.width).unwrap_or(i32::MAX) - MARGIN_RIGHT - 1;
    let bottom = i32::try_from(style.height).unwrap_or(i32::MAX) - MARGIN_BOTTOM - 1;
    if right - MARGIN_LEFT < 2 || bottom - MARGIN_TOP < 2 {
        return canvas.into_image();
    }

    let peak = points.iter().map(|&(_, aqi)| aqi).max().unwrap_or(0);
    let frame = Frame {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        right,
        bottom,
        hours: if hours > 0.0 { hours } else { 1.0 },
        y_max: peak.div_ceil(AQI_STEP).max(1) * AQI_STEP,
    };

    draw_grid(&mut canvas, &frame);
    draw_frame(&mut canvas, &frame);
    draw_series(&mut canvas, &frame, points, style.line);
    draw_legend(&mut canvas, &frame, style);

    canvas.into_image()
}

fn draw_grid(canvas: &mut Canvas, frame: &Frame) {
    canvas.set_alpha(GRID_ALPHA);
    let grid_style = PrimitiveStyle::with_stroke(WHITE, 1);

    for level in (AQI_STEP..frame.y_max).step_by(usize::from(AQI_STEP)) {
        let y = frame.y(f64::from(level));
        for x in (frame.left..frame.right).step_by(2 * DASH as usize) {
            let end = (x + DASH - 1).min(frame.right);
            Line::new(Point::new(x, y), Point::new(end, y))
                .into_styled(grid_style)
                .draw(canvas)
                .ok();
        }
    }

    for h in frame.hour_ticks() {
        let x = frame.x(h);
        if x <= frame.left || x >= frame.right {
            continue;
        }
        for y in (frame.top..frame.bottom).step_by(2 * DASH as usize) {
            let end = (y + DASH - 1).min(frame.bottom);
            Line::new(Point::new(x, y), Point::new(x, end))
                .into_styled(grid_style)
                .draw(canvas)
                .ok();
        }
    }
}

fn draw_frame(canvas: &mut Canvas, frame: &Frame) {
    canvas.set_alpha(FRAME_ALPHA);
    let border = PrimitiveStyle::with_stroke(WHITE, 1);
    Rectangle::with_corners(
        Point::new(frame.left, frame.top),
        Point::new(frame.right, frame.bottom),
    )
    .into_styled(border)
    .draw(canvas)
    .ok();

    let font = MonoTextStyle::new(&PROFONT_9_POINT, WHITE);
    let y_tick = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Middle)
        .build();
    let x_tick = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    for level in (0..=frame.y_max).step_by(usize::from(AQI_STEP)) {
        let y = frame.y(f64::from(level));
        Line::new(Point::new(frame.left - 3, y), Point::new(frame.left, y))
            .into_styled(border)
            .draw(canvas)
            .ok();
        Text::with_text_style(
            &level.to_string(),
            Point::new(frame.left - 5, y),
            font,
            y_tick,
        )
        .draw(canvas)
        .ok();
    }

    for h in frame.hour_ticks() {
        let x = frame.x(h);
        Line::new(Point::new(x, frame.bottom), Point::new(x, frame.bottom + 3))
            .into_styled(border)
            .draw(canvas)
            .ok();
        Text::with_text_style(
            &format!("{h:.0}"),
            Point::new(x, frame.bottom + 5),
            font,
            x_tick,
        )
        .draw(canvas)
        .ok();
    }

    let x_label = format!("Hours (last {:.0}h)", frame.hours);
    let center = (frame.left + frame.right) / 2;
    Text::with_text_style(
        &x_label,
        Point::new(center, frame.bottom + 17),
        font,
        x_tick,
    )
    .draw(canvas)
    .ok();
    Text::with_baseline("AQI", Point::new(2, 2), font, Baseline::Top)
        .draw(canvas)
        .ok();
}

fn draw_series(canvas: &mut Canvas, frame: &Frame, points: &[(f64, u16)], line: Rgba) {
    canvas.set_alpha(line.a);
    let color = rgb(line);
    let pixels: Vec<Point> = points
        .iter()
        .map(|&(h, aqi)| Point::new(frame.x(h), frame.y(f64::from(aqi))))
        .collect();

    match pixels.as_slice() {
        [single] => {
            Circle::with_center(*single, 5)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(canvas)
                .ok();
        }
        _ => {
            Polyline::new(&pixels)
                .into_styled(PrimitiveStyle::with_stroke(color, LINE_WIDTH))
                .draw(canvas)
                .ok();
        }
    }
}

/// Legend box in the upper left of the plot: line sample and location name.
fn draw_legend(canvas: &mut Canvas, frame: &Frame, style: &GraphStyle<'_>) {
    if style.label.is_empty() {
        return;
    }
    let font = MonoTextStyle::new(&PROFONT_9_POINT, BLACK);
    let glyph = PROFONT_9_POINT.character_size;
    let chars = u32::try_from(style.label.chars().count()).unwrap_or(u32::MAX);
    let origin = Point::new(frame.left + 4, frame.top + 4);
    let size = Size::new(
        22 + chars.saturating_mul(glyph.width + PROFONT_9_POINT.character_spacing),
        glyph.height + 4,
    );

    canvas.set_alpha(LEGEND_ALPHA);
    Rectangle::new(origin, size)
        .into_styled(PrimitiveStyle::with_fill(WHITE))
        .draw(canvas)
        .ok();

    let mid = origin.y + i32::try_from(size.height / 2).unwrap_or(0);
    canvas.set_alpha(style.line.a);
    Line::new(Point::new(origin.x + 3, mid), Point::new(origin.x + 15, mid))
        .into_styled(PrimitiveStyle::with_stroke(rgb(style.line), LINE_WIDTH))
        .draw(canvas)
        .ok();

    canvas.set_alpha(u8::MAX);
    Text::with_baseline(
        style.label,
        Point::new(origin.x + 19, mid),
        font,
        Baseline::Middle,
    )
    .draw(canvas)
    .ok();
}
