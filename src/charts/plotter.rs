//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::{label, AccidentRecord, RegionTotals, METRIC_COLUMNS};
use crate::views::{scatter_hover_text, BarSeries, GroupedBars, PieChart, Rgb, ScatterChart};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points};
use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

const CHART_HEIGHT: f32 = 380.0;
const PIE_SIZE: f32 = 320.0;
/// Largest arc drawn as one convex piece of a pie slice.
const PIE_SEGMENT: f32 = PI / 32.0;
const ZERO_RATE_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Creates dashboard charts using egui_plot and the egui painter.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Vertical bars with category labels on the x axis.
    pub fn draw_bar_chart(ui: &mut egui::Ui, series: &BarSeries) {
        ui.label(RichText::new(&series.title).size(15.0).strong());

        let labels: Vec<String> = series.bars.iter().map(|b| b.label.clone()).collect();
        let bars: Vec<Bar> = series
            .bars
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.value)
                    .width(0.7)
                    .name(&b.label)
                    .fill(to_color32(b.color))
            })
            .collect();

        Plot::new(format!("bar_{}", series.title))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(series.x_label.as_str())
            .y_axis_label(series.y_label.as_str())
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < f64::EPSILON && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&series.y_label));
            });
    }

    /// Bars grouped by region, one colored bar per metric.
    pub fn draw_grouped_bar_chart(ui: &mut egui::Ui, chart: &GroupedBars) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());

        let metric_count = chart.metrics.len().max(1) as f64;
        let bar_width = 0.8 / metric_count;
        let groups = chart.groups.clone();

        Plot::new(format!("grouped_{}", chart.title))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(label(crate::data::REGION))
            .y_axis_label("value")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < f64::EPSILON && idx >= 0.0 {
                    groups.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (m, metric) in chart.metrics.iter().enumerate() {
                    let offset = (m as f64 - (metric_count - 1.0) / 2.0) * bar_width;
                    let bars: Vec<Bar> = chart
                        .values
                        .iter()
                        .filter(|v| v.metric == *metric)
                        .filter_map(|v| {
                            let g = chart.groups.iter().position(|g| *g == v.region)?;
                            Some(
                                Bar::new(g as f64 + offset, v.value)
                                    .width(bar_width * 0.95)
                                    .name(format!("{} {}", v.region, label(metric))),
                            )
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .name(label(metric))
                            .color(to_color32(chart.metric_color(metric))),
                    );
                }
            });
    }

    /// Bubble scatter of minor-injury rate (x) against fatality rate (y).
    pub fn draw_scatter_chart(ui: &mut egui::Ui, chart: &ScatterChart) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());

        let points = Arc::clone(&chart.points);

        Plot::new(format!("scatter_{}", chart.title))
            .height(CHART_HEIGHT + 80.0)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(label(crate::data::MINOR_INJURY_RATE))
            .y_axis_label(label(crate::data::FATALITY_RATE))
            .label_formatter(move |name, value: &PlotPoint| {
                scatter_hover_text(&points, name, value.x, value.y)
            })
            .show(ui, |plot_ui| {
                for (region, color) in &chart.regions {
                    for point in chart.points.iter().filter(|p| &p.region == region) {
                        plot_ui.points(
                            Points::new(vec![[point.x, point.y]])
                                .radius(point.radius)
                                .color(to_color32(*color).gamma_multiply(0.75))
                                .name(region),
                        );
                    }
                }
            });

        if !chart.excluded.is_empty() {
            let names: Vec<String> = chart
                .excluded
                .iter()
                .map(|r| format!("{} {}", r.region, r.sub_region))
                .collect();
            ui.label(
                RichText::new(format!(
                    "⚠ 사고건수가 0인 {}개 지역은 비율을 계산할 수 없어 제외되었습니다: {}",
                    names.len(),
                    names.join(", ")
                ))
                .size(12.0)
                .color(ZERO_RATE_COLOR),
            );
        }
    }

    /// Pie chart drawn with the painter, legend to the right.
    pub fn draw_pie_chart(ui: &mut egui::Ui, pie: &PieChart) {
        ui.label(RichText::new(&pie.title).size(15.0).strong());

        ui.horizontal(|ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(PIE_SIZE, PIE_SIZE), egui::Sense::hover());
            let center = rect.center();
            let radius = PIE_SIZE / 2.0 - 4.0;
            let painter = ui.painter_at(rect);

            let angles = pie.angles();
            for (slice, (start, end)) in pie.slices.iter().zip(&angles) {
                for shape in Self::wedge_shapes(center, radius, *start as f32, *end as f32, to_color32(slice.color)) {
                    painter.add(shape);
                }
            }

            if let Some(pos) = response.hover_pos() {
                let d = pos - center;
                if d.length() <= radius {
                    // Clockwise from 12 o'clock, matching `PieChart::angles`
                    let angle = (d.y.atan2(d.x) + FRAC_PI_2).rem_euclid(2.0 * PI) as f64;
                    if let Some(slice) = angles
                        .iter()
                        .position(|(s, e)| angle >= *s && angle < *e)
                        .and_then(|i| pie.slices.get(i))
                    {
                        response.on_hover_text(format!(
                            "{}: {} ({:.1}%)",
                            slice.label,
                            slice.value,
                            slice.share * 100.0
                        ));
                    }
                }
            }

            ui.vertical(|ui| {
                for slice in &pie.slices {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 3.0, to_color32(slice.color));
                        ui.label(
                            RichText::new(format!("{} {:.1}%", slice.label, slice.share * 100.0))
                                .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// Split a slice into convex pieces no wider than `PIE_SEGMENT`.
    fn wedge_shapes(
        center: egui::Pos2,
        radius: f32,
        start: f32,
        end: f32,
        fill: Color32,
    ) -> Vec<egui::Shape> {
        if end <= start {
            return Vec::new();
        }
        let point_at = |a: f32| center + radius * egui::vec2((a - FRAC_PI_2).cos(), (a - FRAC_PI_2).sin());
        let steps = ((end - start) / PIE_SEGMENT).ceil().max(1.0) as usize;
        let step = (end - start) / steps as f32;

        (0..steps)
            .map(|i| {
                let a0 = start + step * i as f32;
                let a1 = a0 + step;
                egui::Shape::convex_polygon(
                    vec![center, point_at(a0), point_at(a1)],
                    fill,
                    egui::Stroke::new(0.5, fill),
                )
            })
            .collect()
    }

    /// Per-region totals table.
    pub fn draw_totals_table(ui: &mut egui::Ui, id: &str, totals: &[RegionTotals]) {
        let rows: Vec<(Vec<String>, [i64; 5])> = totals
            .iter()
            .map(|t| (vec![t.region.clone()], t.metrics()))
            .collect();
        Self::draw_table(ui, id, &[label(crate::data::REGION)], &rows);
    }

    /// Raw rows of one region.
    pub fn draw_records_table(ui: &mut egui::Ui, id: &str, records: &[AccidentRecord]) {
        let rows: Vec<(Vec<String>, [i64; 5])> = records
            .iter()
            .map(|r| {
                (
                    vec![r.region.clone(), r.sub_region.clone()],
                    [
                        r.accidents,
                        r.fatalities,
                        r.serious_injuries,
                        r.minor_injuries,
                        r.injury_reports,
                    ],
                )
            })
            .collect();
        Self::draw_table(
            ui,
            id,
            &[label(crate::data::REGION), label(crate::data::SUB_REGION)],
            &rows,
        );
    }

    fn draw_table(
        ui: &mut egui::Ui,
        id: &str,
        key_headers: &[&str],
        rows: &[(Vec<String>, [i64; 5])],
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt(format!("table_scroll_{}", id))
                    .max_height(260.0)
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id(format!("table_{}", id)))
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in key_headers {
                                    ui.label(RichText::new(*header).strong().size(12.0));
                                }
                                for metric in METRIC_COLUMNS {
                                    ui.label(RichText::new(label(metric)).strong().size(12.0));
                                }
                                ui.end_row();

                                for (keys, values) in rows {
                                    for key in keys {
                                        ui.label(RichText::new(key).size(12.0));
                                    }
                                    for value in values {
                                        ui.label(RichText::new(value.to_string()).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
