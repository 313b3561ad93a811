// ============================================================
// Layer 6: Actual vs Predicted Plot
// ============================================================
// Renders the held-out rows as a PNG line plot:
//
//   x axis: actual label      (rows sorted by actual value)
//   y axis: predicted label
//
// Both axes share one range, so a perfect model traces the grey
// diagonal. Drawn directly into an image::RgbImage.

use std::{fs, path::Path};
use image::{Rgb, RgbImage};

use crate::domain::error::{PipelineError, PipelineResult};

pub const PLOT_FILE: &str = "actuals_vs_predictions.png";

const WIDTH:  u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS:       Rgb<u8> = Rgb([0, 0, 0]);
const DIAGONAL:   Rgb<u8> = Rgb([200, 200, 200]);
const SERIES:     Rgb<u8> = Rgb([31, 119, 180]);

pub fn render_actual_vs_predicted(
    actuals:     &[f64],
    predictions: &[f64],
    path:        &Path,
) -> PipelineResult<()> {
    if actuals.is_empty() || actuals.len() != predictions.len() {
        return Err(PipelineError::Plot(format!(
            "need matching non-empty series, got {} actuals and {} predictions",
            actuals.len(),
            predictions.len()
        )));
    }
    if let Some(i) = (0..actuals.len()).find(|&i| !actuals[i].is_finite() || !predictions[i].is_finite()) {
        return Err(PipelineError::Plot(format!(
            "point {i} is not finite (actual {}, predicted {})",
            actuals[i], predictions[i]
        )));
    }

    let mut order: Vec<usize> = (0..actuals.len()).collect();
    order.sort_by(|&a, &b| actuals[a].total_cmp(&actuals[b]));
    let points: Vec<(f64, f64)> = order.iter().map(|&i| (actuals[i], predictions[i])).collect();

    let (lo, hi) = value_range(actuals.iter().chain(predictions));
    let mut canvas = Canvas::new(lo, hi);

    canvas.line((lo, lo), (hi, hi), DIAGONAL);
    canvas.axes();
    for pair in points.windows(2) {
        canvas.line(pair[0], pair[1], SERIES);
    }
    for &p in &points {
        canvas.marker(p, SERIES);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    canvas
        .image
        .save(path)
        .map_err(|e| PipelineError::Plot(format!("'{}': {e}", path.display())))?;

    tracing::debug!("Wrote plot '{}' ({} points)", path.display(), points.len());
    Ok(())
}

/// Min/max of finite values with a unit pad when all values coincide.
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

struct Canvas {
    image: RgbImage,
    lo:    f64,
    hi:    f64,
}

impl Canvas {
    fn new(lo: f64, hi: f64) -> Self {
        Self { image: RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND), lo, hi }
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (i64, i64) {
        let span = self.hi - self.lo;
        let w = (WIDTH - 2 * MARGIN) as f64;
        let h = (HEIGHT - 2 * MARGIN) as f64;
        let px = MARGIN as f64 + (x - self.lo) / span * w;
        // Image rows grow downwards
        let py = (HEIGHT - MARGIN) as f64 - (y - self.lo) / span * h;
        // Keeps Bresenham bounded when the span itself overflows
        let limit = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as i64;
        (limit(px, WIDTH), limit(py, HEIGHT))
    }

    fn put(&mut self, x: i64, y: i64, colour: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < WIDTH as i64 && y < HEIGHT as i64 {
            self.image.put_pixel(x as u32, y as u32, colour);
        }
    }

    fn axes(&mut self) {
        let (left, bottom) = (MARGIN as i64, (HEIGHT - MARGIN) as i64);
        self.raw_line((left, bottom), ((WIDTH - MARGIN) as i64, bottom), AXIS);
        self.raw_line((left, bottom), (left, MARGIN as i64), AXIS);
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), colour: Rgb<u8>) {
        let a = self.to_pixel(from);
        let b = self.to_pixel(to);
        self.raw_line(a, b, colour);
    }

    fn marker(&mut self, at: (f64, f64), colour: Rgb<u8>) {
        let (cx, cy) = self.to_pixel(at);
        for dx in -2..=2 {
            for dy in -2..=2 {
                self.put(cx + dx, cy + dy, colour);
            }
        }
    }

    // Bresenham
    fn raw_line(&mut self, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), colour: Rgb<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
