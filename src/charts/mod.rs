//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{to_color32, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
