//! Charts module - chart-ready series construction

mod scatter;

pub use scatter::{AxisScale, ScatterData, ScatterPoint};
