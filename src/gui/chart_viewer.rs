//! Chart Viewer Widget
//! Central panel with the indicator scatter chart and the pivoted table.

use crate::charts::ScatterData;
use crate::data::WideView;
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Legend, Plot, Points};

/// Color palette for countries
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 430.0;

/// Scrollable display area for the current selection's chart and table.
#[derive(Default)]
pub struct ChartViewer {
    view: Option<WideView>,
    scatter: Option<ScatterData>,
    warning: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed result of a pipeline run.
    pub fn set_result(&mut self, view: WideView, scatter: ScatterData, warning: Option<String>) {
        self.view = Some(view);
        self.scatter = Some(scatter);
        self.warning = warning;
    }

    /// Drop the display and show `warning` instead.
    pub fn clear(&mut self, warning: Option<String>) {
        self.view = None;
        self.scatter = None;
        self.warning = warning;
    }

    pub fn scatter(&self) -> Option<&ScatterData> {
        self.scatter.as_ref()
    }

    /// Draw the chart viewer.
    pub fn show(&self, ui: &mut egui::Ui) {
        let has_chart = self.scatter.as_ref().is_some_and(|s| !s.is_empty());
        if !has_chart {
            let message = self
                .warning
                .clone()
                .unwrap_or_else(|| "No Data".to_string());
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(message)
                        .size(18.0)
                        .color(Color32::from_rgb(255, 193, 7)),
                );
            });
            return;
        }

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            if let Some(scatter) = &self.scatter {
                Self::draw_scatter_chart(ui, scatter);

                if !scatter.skipped.is_empty() {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!(
                            "Not plotted (no data): {}",
                            scatter.skipped.join(", ")
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
            }

            if let Some(view) = &self.view {
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);
                ui.label(RichText::new("Pivoted view").size(14.0).strong());
                ui.add_space(5.0);
                Self::draw_wide_table(ui, view);
            }
        });
    }

    /// One point series per country so the legend lists countries.
    fn draw_scatter_chart(ui: &mut egui::Ui, scatter: &ScatterData) {
        Plot::new("indicator_scatter")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(scatter.x_label())
            .y_axis_label(scatter.y_label())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, point) in scatter.points.iter().enumerate() {
                    plot_ui.points(
                        Points::new(vec![[point.x, point.y]])
                            .radius(4.0)
                            .color(PALETTE[i % PALETTE.len()])
                            .name(&point.country),
                    );
                }
            });
    }

    fn draw_wide_table(ui: &mut egui::Ui, view: &WideView) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("wide_table")
                        .striped(true)
                        .min_col_width(70.0)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("Country").strong().size(11.0));
                            for column in &view.columns {
                                ui.label(RichText::new(column).strong().size(11.0));
                            }
                            ui.end_row();

                            for row in &view.rows {
                                ui.label(RichText::new(&row.index).size(11.0));
                                for value in &row.values {
                                    ui.label(RichText::new(Self::format_cell(*value)).size(11.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }

    fn format_cell(value: Option<f64>) -> String {
        match value {
            None => "-".to_string(),
            Some(v) if v == v.trunc() => format!("{:.0}", v),
            Some(v) => format!("{:.3}", v),
        }
    }
}
