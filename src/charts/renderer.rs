//! Static Chart Renderer
//! Draws the same render models as the interactive viewer into PNG files
//! with plotters, one image per view.
//!
//! Layout per view:
//! 1. Home: three summary figures
//! 2. Region overview: accident bars (top), fatality share pie (bottom)
//! 3. Sub-region detail: accident bars
//! 4. Comparison: grouped bars with metric legend
//! 5. Rate scatter: bubble scatter with region legend

use crate::data::{label, FATALITY_RATE, MINOR_INJURY_RATE};
use crate::fonts::HANGUL_FONT;
use crate::stats::format_count;
use crate::views::{BarSeries, GroupedBars, PieChart, Rgb, ScatterChart, View};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

const FONT: &str = HANGUL_FONT;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `view` to a PNG at `path`.
    pub fn render_to_file(
        view: &View,
        heading: &str,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(heading, (FONT, 28))?;

        match view {
            View::Home(summary) => {
                let figures = [
                    ("총 사고건수", format_count(summary.total_accidents, "건")),
                    ("총 사망자수", format_count(summary.total_fatalities, "명")),
                    ("총 중상자수", format_count(summary.total_serious_injuries, "명")),
                ];
                Self::draw_figures(&root, &figures)?;
            }
            View::RegionOverview { bars, pie, .. } => {
                let (top, bottom) = root.split_vertically(height / 2);
                Self::draw_bars(&top, bars)?;
                Self::draw_pie(&bottom, pie)?;
            }
            View::SubRegionDetail { bars, .. } => Self::draw_bars(&root, bars)?,
            View::Comparison { chart, .. } => Self::draw_grouped(&root, chart)?,
            View::RateScatter(chart) => Self::draw_scatter(&root, chart)?,
            View::Prompt(message) => {
                root.draw(&Text::new(
                    *message,
                    (40, 60),
                    (FONT, 22).into_font().color(&RED),
                ))?;
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_figures<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        figures: &[(&str, String)],
    ) -> Result<(), RenderError>
    where
        DB::ErrorType: 'static,
    {
        let columns = area.split_evenly((1, figures.len().max(1)));
        for (cell, (caption, value)) in columns.iter().zip(figures) {
            cell.draw(&Text::new(*caption, (30, 60), (FONT, 20).into_font().color(&BLACK)))?;
            cell.draw(&Text::new(
                value.as_str(),
                (30, 100),
                (FONT, 34).into_font().color(&BLACK),
            ))?;
        }
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &BarSeries,
    ) -> Result<(), RenderError>
    where
        DB::ErrorType: 'static,
    {
        let n = series.bars.len() as u32;
        let y_max = (series.max_value() * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(&series.title, (FONT, 20))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n.max(1)).into_segmented(), 0f64..y_max)?;

        let labels: Vec<String> = series.bars.iter().map(|b| b.label.clone()).collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_desc(series.x_label.as_str())
            .y_desc(series.y_label.as_str())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(series.bars.iter().enumerate().map(|(i, bar)| {
            let i = i as u32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), bar.value),
                ],
                rgb(bar.color).filled(),
            )
        }))?;

        Ok(())
    }

    fn draw_grouped<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        grouped: &GroupedBars,
    ) -> Result<(), RenderError>
    where
        DB::ErrorType: 'static,
    {
        let groups = grouped.groups.len().max(1);
        let metrics = grouped.metrics.len().max(1) as f64;
        let y_max = (grouped.max_value() * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(&grouped.title, (FONT, 20))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(groups as f64 - 0.5), 0f64..y_max)?;

        let names = grouped.groups.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(groups * 2 + 1)
            .x_label_formatter(&|x| {
                let idx = x.round();
                if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                    names.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_desc("value")
            .draw()?;

        let width = 0.8 / metrics;
        for (m, metric) in grouped.metrics.iter().enumerate() {
            let color = rgb(grouped.metric_color(metric));
            let offset = (m as f64 - (metrics - 1.0) / 2.0) * width;
            chart
                .draw_series(
                    grouped
                        .values
                        .iter()
                        .filter(|v| v.metric == *metric)
                        .filter_map(|v| {
                            let g = grouped.groups.iter().position(|g| *g == v.region)? as f64;
                            let x0 = g + offset - width / 2.0;
                            Some(Rectangle::new([(x0, 0.0), (x0 + width, v.value)], color.filled()))
                        }),
                )?
                .label(label(metric))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        scatter: &ScatterChart,
    ) -> Result<(), RenderError>
    where
        DB::ErrorType: 'static,
    {
        let x_max = scatter.points.iter().map(|p| p.x).fold(0.0, f64::max);
        let y_max = scatter.points.iter().map(|p| p.y).fold(0.0, f64::max);
        let x_max = if x_max > 0.0 { x_max * 1.1 } else { 1.0 };
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 0.1 };

        let mut chart = ChartBuilder::on(area)
            .caption(&scatter.title, (FONT, 20))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc(label(MINOR_INJURY_RATE))
            .y_desc(label(FATALITY_RATE))
            .draw()?;

        for (region, color) in &scatter.regions {
            let color = rgb(*color);
            chart
                .draw_series(
                    scatter
                        .points
                        .iter()
                        .filter(|p| &p.region == region)
                        .map(|p| Circle::new((p.x, p.y), p.radius, color.mix(0.7).filled())),
                )?
                .label(region.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        if !scatter.excluded.is_empty() {
            area.draw(&Text::new(
                format!("사고건수 0 제외: {}개 지역", scatter.excluded.len()),
                (20, 10),
                (FONT, 14).into_font().color(&RED),
            ))?;
        }

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        pie: &PieChart,
    ) -> Result<(), RenderError>
    where
        DB::ErrorType: 'static,
    {
        let area = area.titled(&pie.title, (FONT, 20))?;
        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = (w.min(h) as f64 / 2.0 - 30.0).max(10.0);

        let sizes: Vec<f64> = pie.slices.iter().map(|s| s.value).collect();
        if sizes.iter().sum::<f64>() <= 0.0 {
            return Ok(());
        }
        let colors: Vec<RGBColor> = pie.slices.iter().map(|s| rgb(s.color)).collect();
        let labels: Vec<String> = pie
            .slices
            .iter()
            .map(|s| format!("{} {:.1}%", s.label, s.share * 100.0))
            .collect();

        let mut chart = Pie::new(&center, &radius, &sizes, &colors, &labels);
        chart.start_angle(-90.0);
        chart.label_style((FONT, 12).into_font().color(&BLACK));
        area.draw(&chart)?;
        Ok(())
    }
}
