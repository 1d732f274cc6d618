//! Minimal inline SVG charts for the HTML reporter

use super::trend::LinearFit;
use std::fmt::Write;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 260.0;
const LEFT: f64 = 64.0;
const RIGHT: f64 = 16.0;
const TOP: f64 = 16.0;
const BOTTOM: f64 = 44.0;
const MAX_X_LABELS: usize = 10;

/// One named line or bar series
pub struct Series<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub values: Vec<Option<f64>>,
}

/// Extras drawn on top of a line chart
#[derive(Default)]
pub struct Overlay<'a> {
    /// Horizontal dashed line
    pub threshold: Option<f64>,
    /// Indices of points on the first series to mark
    pub flagged: &'a [usize],
}

struct Scale {
    lo: f64,
    hi: f64,
}

impl Scale {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (lo, hi) = values.fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let hi = if hi > lo { hi } else { lo + 1.0 };
        Self { lo, hi }
    }

    fn y(&self, v: f64) -> f64 {
        let plot_h = HEIGHT - TOP - BOTTOM;
        TOP + (self.hi - v) / (self.hi - self.lo) * plot_h
    }
}

fn plot_w() -> f64 {
    WIDTH - LEFT - RIGHT
}

/// x of point `i` of `n` on a line chart
fn point_x(i: usize, n: usize) -> f64 {
    if n <= 1 {
        LEFT + plot_w() / 2.0
    } else {
        LEFT + i as f64 * plot_w() / (n - 1) as f64
    }
}

/// Center of band `i` of `n` on a bar chart
fn band_x(i: usize, n: usize) -> f64 {
    LEFT + (i as f64 + 0.5) * plot_w() / n.max(1) as f64
}

fn open(out: &mut String, title: &str) {
    let _ = write!(
        out,
        r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{}">"#,
        escape(title)
    );
}

fn y_axis(out: &mut String, scale: &Scale) {
    for frac in [0.0, 0.5, 1.0] {
        let v = scale.lo + (scale.hi - scale.lo) * frac;
        let y = scale.y(v);
        let _ = write!(
            out,
            r##"<line x1="{LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e2e8f0"/><text x="{:.1}" y="{:.1}" class="tick" text-anchor="end">{}</text>"##,
            WIDTH - RIGHT,
            LEFT - 6.0,
            y + 4.0,
            compact(v)
        );
    }
}

fn x_labels(out: &mut String, labels: &[String], x: impl Fn(usize) -> f64) {
    let step = labels.len().div_ceil(MAX_X_LABELS).max(1);
    let y = HEIGHT - BOTTOM + 18.0;
    for (i, label) in labels.iter().enumerate().step_by(step) {
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{y:.1}" class="tick" text-anchor="middle">{}</text>"#,
            x(i),
            escape(label)
        );
    }
}

/// Line chart over categorical x labels. Missing values break the line.
pub fn line_chart(title: &str, labels: &[String], series: &[Series], overlay: &Overlay) -> String {
    if labels.is_empty() {
        return empty();
    }
    let n = labels.len();
    let scale = Scale::fit(
        series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .chain(overlay.threshold),
    );

    let mut out = String::new();
    open(&mut out, title);
    y_axis(&mut out, &scale);

    for s in series {
        let mut segment: Vec<String> = Vec::new();
        let mut segments = Vec::new();
        for (i, v) in s.values.iter().enumerate() {
            match v {
                Some(v) => segment.push(format!("{:.1},{:.1}", point_x(i, n), scale.y(*v))),
                None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
                None => {}
            }
        }
        if !segment.is_empty() {
            segments.push(segment);
        }
        for seg in segments {
            if seg.len() == 1 {
                if let Some((x, y)) = seg[0].split_once(',') {
                    let _ = write!(out, r#"<circle cx="{x}" cy="{y}" r="3" fill="{}"/>"#, s.color);
                }
            } else {
                let _ = write!(
                    out,
                    r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                    s.color,
                    seg.join(" ")
                );
            }
        }
    }

    if let Some(t) = overlay.threshold {
        let y = scale.y(t);
        let _ = write!(
            out,
            r##"<line x1="{LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#ef4444" stroke-dasharray="6 4"/><text x="{:.1}" y="{:.1}" class="tick" text-anchor="end" fill="#ef4444">threshold {}</text>"##,
            WIDTH - RIGHT,
            WIDTH - RIGHT,
            y - 4.0,
            compact(t)
        );
    }

    if let Some(first) = series.first() {
        for &i in overlay.flagged {
            if let Some(Some(v)) = first.values.get(i) {
                let _ = write!(
                    out,
                    r##"<circle class="flag" cx="{:.1}" cy="{:.1}" r="5" fill="#ef4444"/>"##,
                    point_x(i, n),
                    scale.y(*v)
                );
            }
        }
    }

    x_labels(&mut out, labels, |i| point_x(i, n));
    out.push_str("</svg>");
    out
}

/// Grouped bar chart, one group per label and one bar per series
pub fn bar_chart(title: &str, labels: &[String], series: &[Series]) -> String {
    if labels.is_empty() || series.is_empty() {
        return empty();
    }
    let n = labels.len();
    let scale = Scale::fit(series.iter().flat_map(|s| s.values.iter().flatten().copied()));
    let band = plot_w() / n as f64;
    let bar_w = band * 0.8 / series.len() as f64;

    let mut out = String::new();
    open(&mut out, title);
    y_axis(&mut out, &scale);

    let zero = scale.y(0.0);
    for (k, s) in series.iter().enumerate() {
        for (i, v) in s.values.iter().enumerate() {
            let Some(v) = v else { continue };
            let x = band_x(i, n) - band * 0.4 + k as f64 * bar_w;
            let y = scale.y(*v);
            let _ = write!(
                out,
                r#"<rect x="{x:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                y.min(zero),
                bar_w.max(1.0),
                (zero - y).abs(),
                s.color,
                escape(s.name),
                compact(*v)
            );
        }
    }

    x_labels(&mut out, labels, |i| band_x(i, n));
    out.push_str("</svg>");
    out
}

/// Scatter of `(x, y)` points with an optional fitted line
pub fn scatter(title: &str, points: &[(f64, f64)], fit: Option<&LinearFit>) -> String {
    if points.is_empty() {
        return empty();
    }
    let (x_min, x_max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.0), hi.max(p.0))
    });
    // The trend is drawn over the observed x range only
    let trend = fit.map(|f| ((x_min, f.at(x_min)), (x_max, f.at(x_max))));
    let x_scale = Scale::fit(points.iter().map(|p| p.0));
    let y_scale = Scale::fit(
        points
            .iter()
            .map(|p| p.1)
            .chain(trend.iter().flat_map(|&(a, b)| [a.1, b.1])),
    );
    let px = |x: f64| LEFT + (x - x_scale.lo) / (x_scale.hi - x_scale.lo) * plot_w();

    let mut out = String::new();
    open(&mut out, title);
    y_axis(&mut out, &y_scale);

    for &(x, y) in points {
        let _ = write!(
            out,
            r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#6366f1" fill-opacity="0.7"/>"##,
            px(x),
            y_scale.y(y)
        );
    }

    if let Some(((x0, y0), (x1, y1))) = trend {
        let _ = write!(
            out,
            r##"<line class="trend" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#f59e0b" stroke-width="2"/>"##,
            px(x0),
            y_scale.y(y0),
            px(x1),
            y_scale.y(y1)
        );
    }

    let y = HEIGHT - BOTTOM + 18.0;
    for frac in [0.0, 0.5, 1.0] {
        let v = x_scale.lo + (x_scale.hi - x_scale.lo) * frac;
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{y:.1}" class="tick" text-anchor="middle">{}</text>"#,
            px(v),
            compact(v)
        );
    }
    out.push_str("</svg>");
    out
}

fn empty() -> String {
    r#"<p class="empty">No data in this selection</p>"#.to_string()
}

/// Short axis label: 1.2k, 3.4M
fn compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else if a >= 10.0 || a == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
