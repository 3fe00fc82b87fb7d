//! PNG charts of an analyzed flight.
//!
//! Two charts are produced from a [`FlightReport`]:
//!
//! - **Altitude**: altitude over time with the ceiling as a dashed line.
//! - **Trajectory**: ground track with the no-fly zone and the home point,
//!   drawn in local meters so the aspect ratio is true.
//!
//! Charts carry no text; colors follow the report (blue flight, red limits,
//! green home).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tiny_skia::{
    Color, FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, StrokeDash,
    Transform,
};
use tracing::info;

use crate::compliance::FlightReport;
use crate::geo::{circle, GeoPoint, EARTH_RADIUS_M};

/// File name of the altitude chart.
pub const ALTITUDE_CHART_FILE: &str = "altitude.png";

/// File name of the trajectory chart.
pub const TRAJECTORY_CHART_FILE: &str = "trajectory.png";

/// Segments used to draw the no-fly zone circle.
const GEOFENCE_SEGMENTS: usize = 72;

/// Errors producing charts.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The report has no airborne samples.
    #[error("No flight data to plot")]
    NoData,

    /// The canvas could not be allocated.
    #[error("Invalid chart size {width}x{height}")]
    Canvas { width: u32, height: u32 },

    /// PNG encoding or writing failed.
    #[error("Failed to write chart {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// I/O error preparing the output directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chart dimensions and stroke widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Blank border around the plot area (pixels).
    pub margin: f32,
    /// Stroke width of the flight line (pixels).
    pub line_width: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            margin: 40.0,
            line_width: 2.0,
        }
    }
}

/// Paths of written chart files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFiles {
    /// Altitude chart.
    pub altitude: PathBuf,
    /// Trajectory chart.
    pub trajectory: PathBuf,
}

// ─────────────────────────────────────────────────────────────────────────────
// Drawing helpers
// ─────────────────────────────────────────────────────────────────────────────

const BACKGROUND: Color = Color::WHITE;

fn paint(r: u8, g: u8, b: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    paint
}

fn flight_paint() -> Paint<'static> {
    paint(31, 119, 180)
}

fn limit_paint() -> Paint<'static> {
    paint(214, 39, 40)
}

fn home_paint() -> Paint<'static> {
    paint(44, 160, 44)
}

fn axis_paint() -> Paint<'static> {
    paint(120, 120, 120)
}

fn grid_paint() -> Paint<'static> {
    paint(225, 225, 225)
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

fn polyline<I>(points: I) -> Option<SkPath>
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let mut pb = PathBuilder::new();
    let mut started = false;
    for (x, y) in points {
        if started {
            pb.line_to(x, y);
        } else {
            pb.move_to(x, y);
            started = true;
        }
    }
    pb.finish()
}

/// Linear mapping from data space into the plot area (y up).
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_scale: f64,
    y_min: f64,
    y_scale: f64,
    left: f32,
    bottom: f32,
}

impl Frame {
    fn new(x: (f64, f64), y: (f64, f64), style: &ChartStyle) -> Self {
        let (w, h) = plot_area(style);
        Self {
            x_min: x.0,
            x_scale: w as f64 / span(x),
            y_min: y.0,
            y_scale: h as f64 / span(y),
            left: style.margin,
            bottom: style.height as f32 - style.margin,
        }
    }

    /// Same scale on both axes, centered in the plot area.
    fn equal_aspect(x: (f64, f64), y: (f64, f64), style: &ChartStyle) -> Self {
        let (w, h) = plot_area(style);
        let scale = (w as f64 / span(x)).min(h as f64 / span(y));
        let pad_x = (w as f64 - span(x) * scale) / 2.0;
        let pad_y = (h as f64 - span(y) * scale) / 2.0;
        Self {
            x_min: x.0,
            x_scale: scale,
            y_min: y.0,
            y_scale: scale,
            left: style.margin + pad_x as f32,
            bottom: style.height as f32 - style.margin - pad_y as f32,
        }
    }

    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        (
            self.left + ((x - self.x_min) * self.x_scale) as f32,
            self.bottom - ((y - self.y_min) * self.y_scale) as f32,
        )
    }
}

fn plot_area(style: &ChartStyle) -> (f32, f32) {
    (
        (style.width as f32 - 2.0 * style.margin).max(1.0),
        (style.height as f32 - 2.0 * style.margin).max(1.0),
    )
}

fn span(range: (f64, f64)) -> f64 {
    (range.1 - range.0).max(1.0)
}

fn bounds<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn new_canvas(style: &ChartStyle) -> Result<Pixmap, PlotError> {
    let mut pixmap = Pixmap::new(style.width, style.height).ok_or(PlotError::Canvas {
        width: style.width,
        height: style.height,
    })?;
    pixmap.fill(BACKGROUND);
    Ok(pixmap)
}

fn draw_frame(pixmap: &mut Pixmap, style: &ChartStyle) {
    let (w, h) = plot_area(style);
    let grid = grid_paint();
    for i in 1..5 {
        let gx = style.margin + w * i as f32 / 5.0;
        let gy = style.margin + h * i as f32 / 5.0;
        let lines = [
            polyline([(gx, style.margin), (gx, style.margin + h)]),
            polyline([(style.margin, gy), (style.margin + w, gy)]),
        ];
        for line in lines.iter().flatten() {
            pixmap.stroke_path(line, &grid, &stroke(1.0), Transform::identity(), None);
        }
    }

    if let Some(rect) = Rect::from_xywh(style.margin, style.margin, w, h) {
        let border = PathBuilder::from_rect(rect);
        pixmap.stroke_path(
            &border,
            &axis_paint(),
            &stroke(1.0),
            Transform::identity(),
            None,
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Charts
// ─────────────────────────────────────────────────────────────────────────────

/// Altitude over time with the ceiling line.
pub fn render_altitude_chart(report: &FlightReport, style: &ChartStyle) -> Result<Pixmap, PlotError> {
    let first = report.samples.first().ok_or(PlotError::NoData)?;
    let t0 = first.timestamp_ms;
    let seconds = |ts: u64| ts.saturating_sub(t0) as f64 / 1000.0;

    let ceiling = report.rules.altitude_ceiling_m;
    let (_, max_alt) = bounds(report.samples.iter().map(|s| s.alt));
    let (t_min, t_max) = bounds(report.samples.iter().map(|s| seconds(s.timestamp_ms)));
    let frame = Frame::new((t_min, t_max), (0.0, max_alt.max(ceiling) * 1.1), style);

    let mut pixmap = new_canvas(style)?;
    draw_frame(&mut pixmap, style);

    if let Some(path) = polyline(
        report
            .samples
            .iter()
            .map(|s| frame.map(seconds(s.timestamp_ms), s.alt)),
    ) {
        pixmap.stroke_path(
            &path,
            &flight_paint(),
            &stroke(style.line_width),
            Transform::identity(),
            None,
        );
    }

    let mut dashed = stroke(style.line_width);
    dashed.dash = StrokeDash::new(vec![12.0, 8.0], 0.0);
    if let Some(limit) = polyline([frame.map(t_min, ceiling), frame.map(t_max.max(t_min + 1.0), ceiling)]) {
        pixmap.stroke_path(&limit, &limit_paint(), &dashed, Transform::identity(), None);
    }

    Ok(pixmap)
}

/// Ground track with no-fly zone and home marker.
pub fn render_trajectory_chart(
    report: &FlightReport,
    style: &ChartStyle,
) -> Result<Pixmap, PlotError> {
    let first = report.samples.first().ok_or(PlotError::NoData)?;
    let origin = report
        .home
        .map(|h| h.point())
        .unwrap_or_else(|| first.point());

    // Local east/north meters around the origin
    let cos_lat = origin.lat.to_radians().cos();
    let local = |p: GeoPoint| {
        (
            (p.lon - origin.lon).to_radians() * EARTH_RADIUS_M * cos_lat,
            (p.lat - origin.lat).to_radians() * EARTH_RADIUS_M,
        )
    };

    let track: Vec<(f64, f64)> = report.samples.iter().map(|s| local(s.point())).collect();
    let fence = &report.rules.geofence;
    let ring: Vec<(f64, f64)> = circle(fence.center, fence.radius_m, GEOFENCE_SEGMENTS)
        .into_iter()
        .map(local)
        .collect();

    let everything = || track.iter().chain(ring.iter()).chain(std::iter::once(&(0.0, 0.0)));
    let x_range = bounds(everything().map(|p| p.0));
    let y_range = bounds(everything().map(|p| p.1));
    let frame = Frame::equal_aspect(x_range, y_range, style);

    let mut pixmap = new_canvas(style)?;
    draw_frame(&mut pixmap, style);

    if let Some(zone) = polyline(ring.iter().map(|p| frame.map(p.0, p.1))) {
        pixmap.stroke_path(
            &zone,
            &limit_paint(),
            &stroke(style.line_width * 1.5),
            Transform::identity(),
            None,
        );
    }

    if let Some(path) = polyline(track.iter().map(|p| frame.map(p.0, p.1))) {
        pixmap.stroke_path(
            &path,
            &flight_paint(),
            &stroke(style.line_width),
            Transform::identity(),
            None,
        );
    }

    let (hx, hy) = frame.map(0.0, 0.0);
    let marker = 5.0 * style.line_width;
    if let Some(rect) = Rect::from_xywh(hx - marker, hy - marker, 2.0 * marker, 2.0 * marker) {
        let square = PathBuilder::from_rect(rect);
        pixmap.fill_path(
            &square,
            &home_paint(),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    Ok(pixmap)
}

fn save_png(pixmap: &Pixmap, path: &Path) -> Result<(), PlotError> {
    pixmap.save_png(path).map_err(|e| PlotError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Render both charts into `dir`, creating it if needed.
pub fn save_charts(
    report: &FlightReport,
    dir: impl AsRef<Path>,
    style: &ChartStyle,
) -> Result<ChartFiles, PlotError> {
    if !report.has_data() {
        return Err(PlotError::NoData);
    }

    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let files = ChartFiles {
        altitude: dir.join(ALTITUDE_CHART_FILE),
        trajectory: dir.join(TRAJECTORY_CHART_FILE),
    };

    save_png(&render_altitude_chart(report, style)?, &files.altitude)?;
    save_png(&render_trajectory_chart(report, style)?, &files.trajectory)?;

    info!(
        altitude = %files.altitude.display(),
        trajectory = %files.trajectory.display(),
        "Charts written"
    );
    Ok(files)
}
