//! Control Panel Widget
//! Left sidebar with logo, view menu, data source note and export.

use crate::views::ViewKind;
use egui::{Color32, ComboBox, RichText, TextureHandle};

pub const DATA_SOURCE_NOTE: &str =
    "데이터 출처: 공공데이터포털\n한국도로교통공단_시도 시군구별 교통사고 통계";

/// Left side control panel.
pub struct ControlPanel {
    pub menu: ViewKind,
    pub logo: Option<TextureHandle>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            menu: ViewKind::default(),
            logo: None,
            status: "Ready".to_string(),
            export_enabled: true,
        }
    }
}

impl ControlPanel {
    pub fn new(logo: Option<TextureHandle>) -> Self {
        Self {
            logo,
            ..Self::default()
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        if let Some(logo) = &self.logo {
            ui.add(
                egui::Image::new(egui::load::SizedTexture::from_handle(logo))
                    .max_width(ui.available_width()),
            );
            ui.add_space(10.0);
        }

        // ===== Menu =====
        ui.label(RichText::new("메뉴를 선택하세요").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("menu")
            .width(ui.available_width() - 10.0)
            .selected_text(self.menu.label())
            .show_ui(ui, |ui| {
                for kind in ViewKind::ALL {
                    if ui
                        .selectable_label(self.menu == kind, kind.label())
                        .clicked()
                        && self.menu != kind
                    {
                        self.menu = kind;
                        action = ControlPanelAction::MenuChanged;
                    }
                }
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        egui::Frame::none()
            .fill(Color32::from_rgb(28, 56, 92))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(DATA_SOURCE_NOTE)
                        .size(12.0)
                        .color(Color32::from_rgb(200, 225, 255)),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG Report").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(8.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    MenuChanged,
    ExportReport,
}
