//! Charts module - Static chart rendering

mod renderer;

pub use renderer::StaticChartRenderer;
