//! Report Exporter Module
//! Renders every dashboard view to a PNG file in one folder.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::data::AccidentTable;
use crate::views::{build_view, Selection, ViewError, ViewKind};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Image size of every exported view.
pub const EXPORT_WIDTH: u32 = 1400;
pub const EXPORT_HEIGHT: u32 = 1000;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{view}: {source}")]
    View {
        view: &'static str,
        source: ViewError,
    },
    #[error("{view}: {source}")]
    Render {
        view: &'static str,
        source: RenderError,
    },
}

pub struct ReportExporter;

impl ReportExporter {
    /// Output path of one view inside `dir`, e.g. `03_comparison.png`.
    pub fn file_path(dir: &Path, kind: ViewKind) -> PathBuf {
        let index = ViewKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        dir.join(format!("{:02}_{}.png", index + 1, kind.file_stem()))
    }

    /// Render all five views for the current selection into `dir`, in
    /// parallel. Returns the written files in menu order.
    pub fn export_all(
        table: &AccidentTable,
        selection: &Selection,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let written = ViewKind::ALL
            .par_iter()
            .map(|&kind| {
                let view = build_view(table, kind, selection).map_err(|source| {
                    ExportError::View {
                        view: kind.label(),
                        source,
                    }
                })?;

                let path = Self::file_path(dir, kind);
                StaticChartRenderer::render_to_file(
                    &view,
                    kind.heading(),
                    &path,
                    EXPORT_WIDTH,
                    EXPORT_HEIGHT,
                )
                .map_err(|source| ExportError::Render {
                    view: kind.label(),
                    source,
                })?;
                Ok(path)
            })
            .collect::<Result<Vec<_>, ExportError>>()?;

        info!(dir = %dir.display(), files = written.len(), "Exported report images");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths_follow_menu_order() {
        let dir = Path::new("out");
        assert_eq!(
            ReportExporter::file_path(dir, ViewKind::Home),
            dir.join("01_home.png")
        );
        assert_eq!(
            ReportExporter::file_path(dir, ViewKind::RateScatter),
            dir.join("05_rate_scatter.png")
        );
    }
}
