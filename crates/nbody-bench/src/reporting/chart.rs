//! SVG line charts: one line per benchmark record, problem size on a
//! logarithmic x-axis, one metric on the y-axis.

use crate::dataframe_handler::DataFrameHandler;
use crate::errors::BenchResult;
use crate::measurement::BenchmarkCollection;
use crate::reporting::format::{escape_xml, format_g};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

const MARGIN_LEFT: f64 = 110.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 80.0;

// matplotlib's tab10 cycle
const PALETTE: [&str; 10] = [
    "1f77b4", "ff7f0e", "2ca02c", "d62728", "9467bd", "8c564b", "e377c2", "7f7f7f", "bcbd22",
    "17becf",
];

/// Title, axis labels and geometry of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_log: bool,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl ChartSpec {
    /// Log-log chart over the number of bodies
    pub fn new(title: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Number of Bodies".to_string(),
            y_label: y_label.to_string(),
            y_log: true,
            width: 1600,
            height: 800,
            font_size: 12,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_y_log(mut self, y_log: bool) -> Self {
        self.y_log = y_log;
        self
    }

    fn label_font_size(&self) -> f64 {
        self.font_size as f64 * 5.0 / 3.0
    }
}

struct Series {
    label: String,
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy)]
struct Axis {
    log: bool,
    lo: f64,
    hi: f64,
}

impl Axis {
    /// Axis covering `values` with a small margin; `None` when nothing is plottable
    fn fit(values: impl Iterator<Item = f64>, log: bool) -> Option<Self> {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let (mut lo, mut hi) = if log {
            (min.log10(), max.log10())
        } else {
            (min, max)
        };
        if (hi - lo).abs() < f64::EPSILON {
            let pad = if log { 0.5 } else { lo.abs().max(1.0) * 0.1 };
            lo -= pad;
            hi += pad;
        }
        let margin = (hi - lo) * 0.04;
        Some(Self {
            log,
            lo: lo - margin,
            hi: hi + margin,
        })
    }

    fn transform(&self, v: f64) -> f64 {
        if self.log {
            v.log10()
        } else {
            v
        }
    }

    /// Position of `v` along the axis in `0.0..=1.0`
    fn fraction(&self, v: f64) -> f64 {
        (self.transform(v) - self.lo) / (self.hi - self.lo)
    }

    fn ticks(&self) -> Vec<f64> {
        if self.log {
            log_ticks(self.lo, self.hi)
        } else {
            linear_ticks(self.lo, self.hi)
        }
    }
}

/// Powers of ten inside `[lo, hi]` (exponents); 2× and 5× steps are added
/// when the range spans less than two decades
fn log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let first = lo.ceil() as i32;
    let last = hi.floor() as i32;
    let multipliers: &[f64] = if last - first < 2 { &[1.0, 2.0, 5.0] } else { &[1.0] };

    let mut ticks = Vec::new();
    for p in (lo.floor() as i32)..=last {
        for m in multipliers {
            let v = m * 10f64.powi(p);
            let exp = v.log10();
            if exp >= lo && exp <= hi {
                ticks.push(v);
            }
        }
    }
    ticks
}

fn linear_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let raw = (hi - lo) / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(magnitude * 10.0);

    let mut ticks = Vec::new();
    let mut v = (lo / step).ceil() * step;
    while v <= hi {
        // avoid printing -0
        ticks.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        v += step;
    }
    ticks
}

fn collect_series(
    results: &BenchmarkCollection,
    column: &str,
    y_log: bool,
) -> BenchResult<Vec<Series>> {
    let mut series = Vec::with_capacity(results.len());
    for (label, table) in results.iter() {
        let nbody = table.nbody()?;
        let values = table.metric(column)?;
        let points: Vec<(f64, f64)> = nbody
            .iter()
            .zip(values)
            .map(|(x, y)| (*x as f64, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && (!y_log || *y > 0.0))
            .collect();

        if points.len() < table.height() {
            tracing::debug!(
                "Dropped {} points of '{}' that cannot be drawn on this scale",
                table.height() - points.len(),
                label
            );
        }
        series.push(Series {
            label: label.to_string(),
            points,
        });
    }
    Ok(series)
}

/// Render a line chart of `column` for every record in `results` as SVG
pub fn render_line_chart(
    results: &BenchmarkCollection,
    column: &str,
    spec: &ChartSpec,
) -> BenchResult<String> {
    let series = collect_series(results, column, spec.y_log)?;

    let width = spec.width as f64;
    let height = spec.height as f64;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let font = spec.font_size as f64;
    let label_font = spec.label_font_size();

    let mut svg = String::new();
    writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" font-family=\"DejaVu Sans,Arial,sans-serif\">"
    )?;
    writeln!(svg, "<rect width=\"{width}\" height=\"{height}\" fill=\"white\"/>")?;
    writeln!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"{label_font:.1}\">{}</text>",
        MARGIN_LEFT + plot_w / 2.0,
        MARGIN_TOP / 2.0 + label_font / 3.0,
        escape_xml(&spec.title)
    )?;

    // axis labels
    writeln!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"{label_font:.1}\">{}</text>",
        MARGIN_LEFT + plot_w / 2.0,
        height - MARGIN_BOTTOM / 4.0,
        escape_xml(&spec.x_label)
    )?;
    let y_label_x = label_font;
    let y_label_y = MARGIN_TOP + plot_h / 2.0;
    writeln!(
        svg,
        "<text x=\"{y_label_x:.1}\" y=\"{y_label_y:.1}\" text-anchor=\"middle\" font-size=\"{label_font:.1}\" transform=\"rotate(-90 {y_label_x:.1} {y_label_y:.1})\">{}</text>",
        escape_xml(&spec.y_label)
    )?;

    let x_axis = Axis::fit(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)), true);
    let y_axis = Axis::fit(
        series.iter().flat_map(|s| s.points.iter().map(|p| p.1)),
        spec.y_log,
    );

    let (x_axis, y_axis) = match (x_axis, y_axis) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            writeln!(
                svg,
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"{font:.1}\" fill=\"#888\">no data</text>",
                MARGIN_LEFT + plot_w / 2.0,
                MARGIN_TOP + plot_h / 2.0
            )?;
            draw_frame(&mut svg, plot_w, plot_h)?;
            writeln!(svg, "</svg>")?;
            return Ok(svg);
        }
    };

    let px = |x: f64| MARGIN_LEFT + x_axis.fraction(x) * plot_w;
    let py = |y: f64| MARGIN_TOP + plot_h - y_axis.fraction(y) * plot_h;

    // y ticks with dashed major grid lines
    for t in y_axis.ticks() {
        let y = py(t);
        writeln!(
            svg,
            "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#BBB\" stroke-width=\"1\" stroke-dasharray=\"6,4\"/>",
            MARGIN_LEFT + plot_w
        )?;
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"{font:.1}\">{}</text>",
            MARGIN_LEFT - 8.0,
            y + font / 3.0,
            format_g(t)
        )?;
    }

    // x ticks
    for t in x_axis.ticks() {
        let x = px(t);
        let base = MARGIN_TOP + plot_h;
        writeln!(
            svg,
            "<line x1=\"{x:.1}\" y1=\"{base:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#333\" stroke-width=\"1\"/>",
            base + 6.0
        )?;
        writeln!(
            svg,
            "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"{font:.1}\">{}</text>",
            base + 8.0 + font,
            format_g(t)
        )?;
    }

    draw_frame(&mut svg, plot_w, plot_h)?;

    for (idx, s) in series.iter().enumerate() {
        if s.points.is_empty() {
            continue;
        }
        let colour = PALETTE[idx % PALETTE.len()];
        let points = s
            .points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", px(*x), py(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            "<polyline fill=\"none\" stroke=\"#{colour}\" stroke-width=\"2\" points=\"{points}\"/>"
        )?;
    }

    draw_legend(&mut svg, &series, font)?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn draw_frame(svg: &mut String, plot_w: f64, plot_h: f64) -> BenchResult<()> {
    writeln!(
        svg,
        "<rect x=\"{MARGIN_LEFT:.1}\" y=\"{MARGIN_TOP:.1}\" width=\"{plot_w:.1}\" height=\"{plot_h:.1}\" fill=\"none\" stroke=\"#333\" stroke-width=\"1\"/>"
    )?;
    Ok(())
}

fn draw_legend(svg: &mut String, series: &[Series], font: f64) -> BenchResult<()> {
    if series.is_empty() {
        return Ok(());
    }
    let row_h = font * 1.6;
    let longest = series
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0) as f64;
    let box_w = 40.0 + longest * font * 0.6;
    let box_h = row_h * series.len() as f64 + font * 0.6;
    let x = MARGIN_LEFT + 12.0;
    let y = MARGIN_TOP + 12.0;

    writeln!(
        svg,
        "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{box_w:.1}\" height=\"{box_h:.1}\" rx=\"4\" fill=\"white\" fill-opacity=\"0.85\" stroke=\"#CCC\"/>"
    )?;
    for (idx, s) in series.iter().enumerate() {
        let colour = PALETTE[idx % PALETTE.len()];
        let row_y = y + font * 0.3 + row_h * (idx as f64 + 0.5);
        writeln!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{row_y:.1}\" x2=\"{:.1}\" y2=\"{row_y:.1}\" stroke=\"#{colour}\" stroke-width=\"2\"/>",
            x + 8.0,
            x + 30.0
        )?;
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{font:.1}\">{}</text>",
            x + 36.0,
            row_y + font / 3.0,
            escape_xml(&s.label)
        )?;
    }
    Ok(())
}

/// Render a chart and write it to `<output_dir>/<name>.svg`
pub fn write_line_chart(
    results: &BenchmarkCollection,
    column: &str,
    spec: &ChartSpec,
    output_dir: &Path,
    name: &str,
) -> BenchResult<PathBuf> {
    if results.is_empty() {
        tracing::warn!("Chart '{}' has no series to draw", name);
    }
    let svg = render_line_chart(results, column, spec)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.svg", DataFrameHandler::sanitize_filename(name)));
    fs::write(&path, svg)?;
    tracing::info!("Wrote chart {}", path.display());
    Ok(path)
}
