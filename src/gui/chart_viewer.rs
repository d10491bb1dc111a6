//! Chart Viewer Widget
//! Central panel: per-view selection widgets, tables and charts.

use crate::charts::ChartPlotter;
use crate::stats::format_count;
use crate::views::{Selection, View, ViewKind};
use egui::{Color32, ComboBox, RichText, TextureHandle};

const DATA_PORTAL_URL: &str = "https://www.data.go.kr/data/15070339/fileData.do";
const SECTION_SPACING: f32 = 15.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);

/// Scrollable view area for the selected menu entry.
pub struct ChartViewer {
    pub banner: Option<TextureHandle>,
}

impl ChartViewer {
    pub fn new(banner: Option<TextureHandle>) -> Self {
        Self { banner }
    }

    /// Draw the selection widgets the view needs. Returns true when the
    /// selection changed.
    pub fn show_controls(
        ui: &mut egui::Ui,
        kind: ViewKind,
        selection: &mut Selection,
        regions: &[String],
    ) -> bool {
        match kind {
            ViewKind::Home | ViewKind::RegionOverview => false,
            ViewKind::SubRegionDetail => Self::region_select(ui, selection, regions),
            ViewKind::Comparison => Self::region_multi_select(
                ui,
                "compare",
                "비교할 시도를 선택하세요",
                &mut selection.comparison,
                regions,
            ),
            ViewKind::RateScatter => Self::region_multi_select(
                ui,
                "scatter",
                "분석할 시도를 선택하세요",
                &mut selection.scatter,
                regions,
            ),
        }
    }

    /// Draw a built view.
    pub fn show_view(&self, ui: &mut egui::Ui, view: &View) {
        match view {
            View::Home(summary) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("데이터 출처:").strong());
                    ui.hyperlink_to(
                        "공공데이터포털 - 한국도로교통공단_시도 시군구별 교통사고 통계",
                        DATA_PORTAL_URL,
                    );
                });
                ui.label(
                    "이 앱은 시도 및 시군구별 교통사고 통계를 기반으로 지역별 사고 규모, \
                     사망자 수, 부상자 현황 등을 시각화한 분석 대시보드입니다.",
                );
                ui.add_space(SECTION_SPACING);

                if let Some(banner) = &self.banner {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(banner))
                            .max_width(ui.available_width()),
                    );
                    ui.add_space(SECTION_SPACING);
                }

                Self::metric(ui, "총 사고건수", &format_count(summary.total_accidents, "건"));
                Self::metric(ui, "총 사망자수", &format_count(summary.total_fatalities, "명"));
                Self::metric(
                    ui,
                    "총 중상자수",
                    &format_count(summary.total_serious_injuries, "명"),
                );
            }
            View::RegionOverview { totals, bars, pie } => {
                ChartPlotter::draw_totals_table(ui, "region_overview", totals);
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_bar_chart(ui, bars);
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_pie_chart(ui, pie);
            }
            View::SubRegionDetail { region, rows, bars } => {
                ChartPlotter::draw_records_table(ui, &format!("sub_region_{}", region), rows);
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_bar_chart(ui, bars);
            }
            View::Comparison { totals, chart } => {
                ChartPlotter::draw_totals_table(ui, "comparison", totals);
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_grouped_bar_chart(ui, chart);
            }
            View::RateScatter(chart) => {
                ui.label("이 탭은 지역별 사고 양상을 분석합니다.");
                ui.label("• 사망률: 사고 1건당 사망자 비율");
                ui.label("• 경상률: 사고 1건당 경상자 비율");
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_scatter_chart(ui, chart);
            }
            View::Prompt(message) => {
                egui::Frame::none()
                    .fill(WARNING_COLOR.gamma_multiply(0.2))
                    .rounding(5.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(format!("⚠ {}", message)).color(WARNING_COLOR));
                    });
            }
        }
    }

    fn metric(ui: &mut egui::Ui, caption: &str, value: &str) {
        ui.label(RichText::new(caption).size(14.0).color(Color32::GRAY));
        ui.label(RichText::new(value).size(30.0).strong());
        ui.add_space(8.0);
    }

    fn region_select(ui: &mut egui::Ui, selection: &mut Selection, regions: &[String]) -> bool {
        let mut changed = false;
        let current = selection
            .region
            .clone()
            .or_else(|| regions.first().cloned())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.label("시도를 선택하세요");
            ComboBox::from_id_salt("region_select")
                .width(160.0)
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    for region in regions {
                        if ui.selectable_label(current == *region, region).clicked()
                            && current != *region
                        {
                            selection.region = Some(region.clone());
                            changed = true;
                        }
                    }
                });
        });
        ui.add_space(SECTION_SPACING);

        changed
    }

    /// Checkbox list keeping the order in which regions were picked.
    fn region_multi_select(
        ui: &mut egui::Ui,
        id: &str,
        prompt: &str,
        selected: &mut Vec<String>,
        regions: &[String],
    ) -> bool {
        let mut changed = false;

        ui.label(RichText::new(prompt).strong());
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for region in regions {
                            let mut on = selected.contains(region);
                            if ui.checkbox(&mut on, region).changed() {
                                if on {
                                    selected.push(region.clone());
                                } else {
                                    selected.retain(|r| r != region);
                                }
                                changed = true;
                            }
                        }
                    });
                });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                *selected = regions.to_vec();
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                selected.clear();
                changed = true;
            }
        });
        ui.add_space(SECTION_SPACING);

        changed
    }
}
