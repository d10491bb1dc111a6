//! Views module - menu dispatch and chart-ready render models

mod model;
mod selector;

pub use model::{
    continuous_color, palette_color, scatter_hover_text, BarSeries, GroupedBars, PieChart, Rgb,
    ScatterChart, View, MAX_POINT_RADIUS,
};
pub use selector::{build_view, Selection, ViewCache, ViewError, ViewKind};
