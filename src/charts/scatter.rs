//! Scatter Series Module
//! Pairs two pivoted indicator columns into chart-ready per-country points.

use crate::data::WideView;
use serde::Serialize;
use tracing::debug;

/// Per-axis scale choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

impl AxisScale {
    /// Map a value onto the axis. Log scale is a data transform; values
    /// that cannot be drawn on a log axis map to `None`.
    pub fn apply(&self, value: f64) -> Option<f64> {
        match self {
            AxisScale::Linear => Some(value),
            AxisScale::Log => (value > 0.0).then(|| value.log10()),
        }
    }

    pub fn axis_label(&self, indicator: &str) -> String {
        match self {
            AxisScale::Linear => indicator.to_string(),
            AxisScale::Log => format!("log10({})", indicator),
        }
    }
}

/// One plottable point.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

/// Chart-ready scatter series for one (year, countries, indicator pair)
/// selection. An empty `points` list is the no-data state the shell turns
/// into an inline warning instead of a chart.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterData {
    pub x_indicator: String,
    pub y_indicator: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub points: Vec<ScatterPoint>,
    /// Countries in the view that could not be plotted (missing either
    /// coordinate, or non-positive under a log scale).
    pub skipped: Vec<String>,
}

impl ScatterData {
    pub fn build(
        view: &WideView,
        x_indicator: &str,
        y_indicator: &str,
        x_scale: AxisScale,
        y_scale: AxisScale,
    ) -> Self {
        let x_pos = view.column_position(x_indicator);
        let y_pos = view.column_position(y_indicator);

        let mut points: Vec<ScatterPoint> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();

        for row in &view.rows {
            let plotted = x_pos
                .and_then(|p| row.values[p])
                .and_then(|x| x_scale.apply(x))
                .zip(
                    y_pos
                        .and_then(|p| row.values[p])
                        .and_then(|y| y_scale.apply(y)),
                );

            match plotted {
                Some((x, y)) => points.push(ScatterPoint {
                    country: row.index.clone(),
                    x,
                    y,
                }),
                None => skipped.push(row.index.clone()),
            }
        }

        if !skipped.is_empty() {
            debug!(
                "scatter {} vs {}: {} plotted, {} skipped",
                x_indicator,
                y_indicator,
                points.len(),
                skipped.len()
            );
        }

        Self {
            x_indicator: x_indicator.to_string(),
            y_indicator: y_indicator.to_string(),
            x_scale,
            y_scale,
            points,
            skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_label(&self) -> String {
        self.x_scale.axis_label(&self.x_indicator)
    }

    pub fn y_label(&self) -> String {
        self.y_scale.axis_label(&self.y_indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::long_rows;
    use crate::data::pivot;
    use anyhow::Result;

    fn view() -> crate::data::WideView {
        let df = long_rows(&[
            ("A", "GDP", 2000, Some(100.0)),
            ("A", "POP", 2000, Some(5.0)),
            ("B", "GDP", 2000, Some(-200.0)),
            ("B", "POP", 2000, Some(9.0)),
            ("C", "GDP", 2000, None),
            ("C", "POP", 2000, Some(2.0)),
        ]);
        pivot(&df, "country", "indicator", "value").unwrap()
    }

    #[test]
    fn pairs_countries_with_both_coordinates() -> Result<()> {
        let data = ScatterData::build(&view(), "GDP", "POP", AxisScale::Linear, AxisScale::Linear);

        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[0].country, "A");
        assert_eq!((data.points[0].x, data.points[0].y), (100.0, 5.0));
        // C has a missing GDP value and is skipped, not zeroed.
        assert_eq!(data.skipped, vec!["C".to_string()]);
        Ok(())
    }

    #[test]
    fn log_scale_transforms_and_skips_non_positive() -> Result<()> {
        let data = ScatterData::build(&view(), "GDP", "POP", AxisScale::Log, AxisScale::Linear);

        // B's GDP is negative and cannot sit on a log axis.
        assert_eq!(data.points.len(), 1);
        assert_eq!(data.points[0].country, "A");
        assert!((data.points[0].x - 2.0).abs() < 1e-12);
        assert!(data.skipped.contains(&"B".to_string()));
        assert_eq!(data.x_label(), "log10(GDP)");
        assert_eq!(data.y_label(), "POP");
        Ok(())
    }

    #[test]
    fn absent_indicator_yields_the_empty_state() -> Result<()> {
        let data = ScatterData::build(
            &view(),
            "GDP",
            "LIFE_EXP",
            AxisScale::Linear,
            AxisScale::Linear,
        );

        assert!(data.is_empty());
        assert_eq!(data.skipped.len(), 3);
        Ok(())
    }

    #[test]
    fn empty_view_yields_the_empty_state() -> Result<()> {
        let df = long_rows(&[]);
        let empty = pivot(&df, "country", "indicator", "value")?;
        let data = ScatterData::build(&empty, "GDP", "POP", AxisScale::Linear, AxisScale::Linear);
        assert!(data.is_empty());
        assert!(data.skipped.is_empty());
        Ok(())
    }
}
