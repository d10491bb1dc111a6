//! Chart-ready render models.
//! Plain data shared by the interactive plotter and the static renderer.

use crate::data::{AccidentRecord, MetricValue, RegionTotals};
use crate::stats::Summary;
use std::sync::Arc;

/// RGB color, converted to the drawing backend's type at draw time.
pub type Rgb = [u8; 3];

/// Categorical palette for regions and metrics.
pub const PALETTE: [Rgb; 10] = [
    [99, 110, 250],  // Blue
    [239, 85, 59],   // Red
    [0, 204, 150],   // Green
    [171, 99, 250],  // Purple
    [255, 161, 90],  // Orange
    [25, 211, 243],  // Cyan
    [255, 102, 146], // Pink
    [182, 232, 128], // Light Green
    [255, 151, 255], // Magenta
    [254, 203, 82],  // Yellow
];

/// Sequential red scale, light to dark.
pub const REDS: [Rgb; 3] = [[255, 245, 240], [251, 106, 74], [103, 0, 13]];

/// Sequential scale used for sub-region bars.
pub const PLASMA: [Rgb; 4] = [[13, 8, 135], [156, 23, 158], [237, 121, 83], [240, 249, 33]];

pub const MIN_POINT_RADIUS: f32 = 3.0;
pub const MAX_POINT_RADIUS: f32 = 18.0;

pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Piecewise-linear interpolation over `stops` at `t` in [0, 1].
pub fn continuous_color(stops: &[Rgb], t: f64) -> Rgb {
    match stops.len() {
        0 => [0, 0, 0],
        1 => stops[0],
        n => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let pos = t * (n - 1) as f64;
            let lower = (pos.floor() as usize).min(n - 2);
            let frac = pos - lower as f64;
            let (a, b) = (stops[lower], stops[lower + 1]);
            let mix = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * frac).round() as u8;
            [mix(0), mix(1), mix(2)]
        }
    }
}

/// Point radius for a bubble whose area follows `value / max`.
pub fn point_radius(value: i64, max: i64) -> f32 {
    if max <= 0 || value <= 0 {
        return MIN_POINT_RADIUS;
    }
    let t = (value as f64 / max as f64).clamp(0.0, 1.0).sqrt() as f32;
    MIN_POINT_RADIUS + (MAX_POINT_RADIUS - MIN_POINT_RADIUS) * t
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

/// A single-series bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<BarDatum>,
}

impl BarSeries {
    /// Bars colored on `scale` by their value relative to the largest bar.
    pub fn shaded(
        title: String,
        x_label: &str,
        y_label: &str,
        data: Vec<(String, f64)>,
        scale: &[Rgb],
    ) -> Self {
        let max = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let bars = data
            .into_iter()
            .map(|(label, value)| {
                let t = if max > 0.0 { value / max } else { 0.0 };
                BarDatum {
                    label,
                    value,
                    color: continuous_color(scale, t),
                }
            })
            .collect();

        Self {
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            bars,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the whole, 0 when the whole is 0.
    pub share: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_values(title: String, data: Vec<(String, f64)>) -> Self {
        let total: f64 = data.iter().map(|(_, v)| *v).sum();
        let slices = data
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| PieSlice {
                label,
                value,
                share: if total > 0.0 { value / total } else { 0.0 },
                color: palette_color(i),
            })
            .collect();
        Self { title, slices }
    }

    /// (start, end) angle in radians of every slice, clockwise from 12 o'clock.
    pub fn angles(&self) -> Vec<(f64, f64)> {
        let mut start = 0.0;
        self.slices
            .iter()
            .map(|s| {
                let end = start + s.share * std::f64::consts::TAU;
                let span = (start, end);
                start = end;
                span
            })
            .collect()
    }
}

/// Grouped bars keyed by (region, metric).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBars {
    pub title: String,
    pub groups: Vec<String>,
    pub metrics: Vec<&'static str>,
    pub values: Vec<MetricValue>,
}

impl GroupedBars {
    pub fn metric_color(&self, metric: &str) -> Rgb {
        let idx = self.metrics.iter().position(|m| *m == metric).unwrap_or(0);
        palette_color(idx)
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().map(|v| v.value).fold(0.0, f64::max)
    }
}

/// One sub-region in the rate scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub region: String,
    pub sub_region: String,
    pub accidents: i64,
    pub fatalities: i64,
    pub minor_injuries: i64,
    /// Minor-injury rate.
    pub x: f64,
    /// Fatality rate.
    pub y: f64,
    pub radius: f32,
    pub color: Rgb,
}

impl ScatterPoint {
    /// Hover text with the inspection fields.
    pub fn hover_text(&self) -> String {
        format!(
            "{} {}\n사고건수: {}\n사망자수: {}\n경상자수: {}\n경상률: {:.4}\n사망률: {:.4}",
            self.region,
            self.sub_region,
            self.accidents,
            self.fatalities,
            self.minor_injuries,
            self.x,
            self.y
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    /// Legend entries in selection order.
    pub regions: Vec<(String, Rgb)>,
    /// Shared with the plot's hover formatter.
    pub points: Arc<[ScatterPoint]>,
    /// Rows left out because their rates are undefined.
    pub excluded: Vec<AccidentRecord>,
}

/// Tooltip for a hover at (x, y) on the scatter plot. `name` is the legend
/// name of the hovered series, empty when the cursor is over no point.
pub fn scatter_hover_text(points: &[ScatterPoint], name: &str, x: f64, y: f64) -> String {
    if name.is_empty() {
        return format!("경상률: {:.4}\n사망률: {:.4}", x, y);
    }

    points
        .iter()
        .filter(|p| p.region == name)
        .min_by(|a, b| {
            let da = (a.x - x).powi(2) + (a.y - y).powi(2);
            let db = (b.x - x).powi(2) + (b.y - y).powi(2);
            da.total_cmp(&db)
        })
        .map(ScatterPoint::hover_text)
        .unwrap_or_default()
}

/// What the central panel shows for the current menu and selection.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home(Summary),
    RegionOverview {
        totals: Vec<RegionTotals>,
        bars: BarSeries,
        pie: PieChart,
    },
    SubRegionDetail {
        region: String,
        rows: Vec<AccidentRecord>,
        bars: BarSeries,
    },
    Comparison {
        totals: Vec<RegionTotals>,
        chart: GroupedBars,
    },
    RateScatter(ScatterChart),
    /// A required selection is empty; nothing was computed.
    Prompt(&'static str),
}
