use super::{min_and_max, PlotError, Record, Result};
use log::{debug, warn};
use plotters::coord::ranged1d::{AsRangedCoord, Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::Path;

const MAJOR_GRID: RGBColor = RGBColor(178, 178, 178);
const MINOR_GRID: RGBColor = RGBColor(204, 204, 204);
const LINE_COLOR: RGBColor = RGBColor(0, 0, 255);
const MARKER_SIZE: u32 = 2;
/// minor grid lines between two major ones
const MINOR_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    /// whether the value can be placed on an axis with this scale
    fn accepts(self, v: f64) -> bool {
        match self {
            AxisScale::Linear => true,
            AxisScale::Log => v > 0.,
        }
    }
}

/// Scaling of both axes, chosen from the prefix of the csv file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaling {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl Scaling {
    /// `xlog_` -> log x, `ylog_` -> log y, `log_` -> both, anything else linear.
    /// Checked in this order, first match wins.
    pub fn from_name(name: &str) -> Scaling {
        use AxisScale::*;
        let (x, y) = if name.starts_with("xlog_") {
            (Log, Linear)
        } else if name.starts_with("ylog_") {
            (Linear, Log)
        } else if name.starts_with("log_") {
            (Log, Log)
        } else {
            (Linear, Linear)
        };
        Scaling { x, y }
    }
}

/// Image format of a written plot, taken from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<OutputFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("png") | Some("jpg") | Some("jpeg") | Some("bmp") => Ok(OutputFormat::Bitmap),
            _ => Err(PlotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A plot drawn in display mode, waiting to be shown with the others.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub name: String,
    pub svg: String,
}

/// draws the record into an in-memory svg
pub fn render_svg(record: &Record, size: (u32, u32)) -> Result<Rendering> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root, record)?;
        root.present().map_err(render_err)?;
    }
    Ok(Rendering {
        name: record.source_name().to_string(),
        svg,
    })
}

/// Writes the plot of the record to `path`.
/// When the save fails because the parent directory is missing,
/// the directory is created and the save is tried once more.
pub fn save_plot(record: &Record, path: &Path, size: (u32, u32)) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    match write_image(record, path, format, size) {
        Ok(()) => Ok(()),
        Err(e) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                warn!("{} does not exist, creating it", parent.display());
                fs::create_dir_all(parent).map_err(|source| PlotError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
                write_image(record, path, format, size)
            }
            _ => Err(e),
        },
    }
}

fn write_image(record: &Record, path: &Path, format: OutputFormat, size: (u32, u32)) -> Result<()> {
    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(&root, record)?;
            root.present().map_err(render_err)
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(&root, record)?;
            root.present().map_err(render_err)
        }
    }
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Render(e.to_string())
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, record: &Record) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let scaling = Scaling::from_name(record.source_name());
    debug!("{} plotted with {:?}", record.source_name(), scaling);
    let xr = axis_range(record.x(), scaling.x);
    let yr = axis_range(record.y(), scaling.y);
    // each combination gives a different coordinate type
    match (scaling.x, scaling.y) {
        (AxisScale::Linear, AxisScale::Linear) => draw_chart(root, record, scaling, xr, yr),
        (AxisScale::Log, AxisScale::Linear) => draw_chart(root, record, scaling, xr.log_scale(), yr),
        (AxisScale::Linear, AxisScale::Log) => draw_chart(root, record, scaling, xr, yr.log_scale()),
        (AxisScale::Log, AxisScale::Log) => {
            draw_chart(root, record, scaling, xr.log_scale(), yr.log_scale())
        }
    }
}

fn draw_chart<DB, X, Y>(
    root: &DrawingArea<DB, Shift>,
    record: &Record,
    scaling: Scaling,
    x_spec: X,
    y_spec: Y,
) -> Result<()>
where
    DB: DrawingBackend,
    X: AsRangedCoord<Value = f64>,
    Y: AsRangedCoord<Value = f64>,
    X::CoordDescType: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y::CoordDescType: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let mut chart = ChartBuilder::on(root)
        .caption(record.title(), ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x_spec, y_spec)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .bold_line_style(MAJOR_GRID.stroke_width(1))
        .light_line_style(MINOR_GRID.stroke_width(1))
        .x_max_light_lines(MINOR_LINES)
        .y_max_light_lines(MINOR_LINES)
        .set_all_tick_mark_size(4)
        .x_desc(record.x_label())
        .y_desc(record.y_label())
        .x_label_formatter(&|v: &f64| tick_label(*v))
        .y_label_formatter(&|v: &f64| tick_label(*v))
        .draw()
        .map_err(render_err)?;

    let points = visible_points(record, scaling);
    chart
        .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(1)))
        .map_err(render_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, MARKER_SIZE, LINE_COLOR.filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

/// data span with a 5% margin on each side, in log space for log axes;
/// flat data get a margin of 5% of the value, at least 1.
/// The range always has finite ends and a finite span.
fn axis_range(values: &[f64], scale: AxisScale) -> Range<f64> {
    match scale {
        AxisScale::Linear => {
            let (min, max) = min_and_max(values).unwrap_or((0., 1.));
            pad(min, max)
        }
        AxisScale::Log => {
            let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.).collect();
            match min_and_max(&positive[..]) {
                Some((min, max)) => {
                    let r = pad(min.log10(), max.log10());
                    let lo = 10f64.powf(r.start);
                    let hi = 10f64.powf(r.end);
                    // a margin past the f64 limits falls back to the data bound
                    let lo = if lo > 0. && lo.is_finite() { lo } else { min };
                    let hi = if hi.is_finite() { hi } else { max };
                    lo..hi
                }
                None => 1.0..10.0,
            }
        }
    }
}

fn pad(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let margin = if span > 0. {
        span / 20.
    } else {
        (min.abs() / 20.).max(1.)
    };
    let candidates = [
        (min - margin)..(max + margin),
        (min - margin)..max,
        min..(max + margin),
        min..max,
    ];
    if let Some(r) = candidates.iter().find(|r| drawable(r)) {
        return r.clone();
    }
    // the data span itself does not fit in an f64, plotters would never finish the ticks
    let half = f64::MAX / 2.;
    warn!("data span {}..{} too wide, clipping the axis to +-{:e}", min, max, half);
    min.max(-half)..max.min(half)
}

/// finite ends with a finite, non-empty span
fn drawable(r: &Range<f64>) -> bool {
    r.start.is_finite() && r.end.is_finite() && r.end > r.start && (r.end - r.start).is_finite()
}

/// points that can be drawn with the given scaling, in file order
fn visible_points(record: &Record, scaling: Scaling) -> Vec<(f64, f64)> {
    let points: Vec<(f64, f64)> = record
        .points()
        .filter(|&(x, y)| scaling.x.accepts(x) && scaling.y.accepts(y))
        .collect();
    let skipped = record.len() - points.len();
    if skipped > 0 {
        warn!(
            "{}: skipped {} non-positive point(s) on the log axis",
            record.source_name(),
            skipped
        );
    }
    points
}

fn tick_label(v: f64) -> String {
    let a = v.abs();
    if a != 0. && (a >= 1e5 || a < 1e-3) {
        return format!("{:e}", v);
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}
