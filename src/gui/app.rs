//! Traffic Dashboard Main Application
//! Main window with control panel and view area.

use crate::config::DashboardConfig;
use crate::data::AccidentTable;
use crate::fonts;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::ReportExporter;
use crate::views::{Selection, ViewCache};
use egui::{RichText, SidePanel, TextureHandle};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, files: usize },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    table: Arc<AccidentTable>,
    regions: Vec<String>,
    selection: Selection,
    cache: ViewCache,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &DashboardConfig,
        table: AccidentTable,
        regions: Vec<String>,
        font: Option<&'static [u8]>,
    ) -> Self {
        if let Some(bytes) = font {
            cc.egui_ctx.set_fonts(fonts::definitions(bytes));
        }

        let selection = Selection::with_defaults(
            &regions,
            &config.comparison_defaults,
            config.scatter_default_count,
        );
        let logo = load_texture(&cc.egui_ctx, "logo", &config.logo_path);
        let banner = load_texture(&cc.egui_ctx, "banner", &config.banner_path);

        let mut control_panel = ControlPanel::new(logo);
        control_panel.set_status(&format!(
            "Loaded {} rows, {} regions",
            table.row_count(),
            regions.len()
        ));

        Self {
            table: Arc::new(table),
            regions,
            selection,
            cache: ViewCache::new(),
            control_panel,
            chart_viewer: ChartViewer::new(banner),
            export_rx: None,
            is_exporting: false,
        }
    }

    /// Ask for a folder and render every view there on a worker thread.
    fn handle_export_report(&mut self) {
        if self.is_exporting {
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Export folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        self.is_exporting = true;
        self.control_panel.export_enabled = false;
        self.control_panel.set_status("Rendering charts...");

        let (tx, rx) = channel();
        self.export_rx = Some(rx);

        let table = Arc::clone(&self.table);
        let selection = self.selection.clone();

        thread::spawn(move || {
            let result = match ReportExporter::export_all(&table, &selection, &dir) {
                Ok(files) => ExportResult::Complete {
                    dir,
                    files: files.len(),
                },
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(ExportResult::Complete { dir, files }) => {
                self.control_panel
                    .set_status(&format!("Exported {} charts to {}", files, dir.display()));
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, "Could not open export folder");
                }
                self.finish_export();
            }
            Ok(ExportResult::Error(e)) => {
                error!(error = %e, "Export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
                self.finish_export();
            }
            Err(_) => {
                // Still running
                self.export_rx = Some(rx);
            }
        }
    }

    fn finish_export(&mut self) {
        self.is_exporting = false;
        self.control_panel.export_enabled = true;
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();

        if self.is_exporting {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::MenuChanged => {
                            info!(view = self.control_panel.menu.label(), "Menu changed");
                        }
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - current view
        let kind = self.control_panel.menu;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading(RichText::new(kind.heading()).size(26.0));
                    ui.add_space(10.0);

                    if ChartViewer::show_controls(ui, kind, &mut self.selection, &self.regions) {
                        debug!(selection = ?self.selection, "Selection changed");
                    }

                    match self.cache.get_or_build(&self.table, kind, &self.selection) {
                        Ok(view) => self.chart_viewer.show_view(ui, view),
                        Err(e) => {
                            ui.colored_label(
                                egui::Color32::from_rgb(220, 53, 69),
                                format!("Error: {}", e),
                            );
                        }
                    }
                });
        });
    }
}

/// Decode a decorative image into a texture. Failures are logged and the
/// image is skipped.
fn load_texture(ctx: &egui::Context, name: &str, path: &Path) -> Option<TextureHandle> {
    let img = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping image");
            return None;
        }
    };

    let size = [img.width() as usize, img.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
    Some(ctx.load_texture(name, color_image, egui::TextureOptions::default()))
}
