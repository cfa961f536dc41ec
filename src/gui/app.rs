//! Indicator Dash Main Application
//! Main window wiring the control panel to the pure data pipeline.

use crate::charts::ScatterData;
use crate::data::{pivot, reduce_to_countries, reduce_to_year, TableCache, UnifiedTable, WideView};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, Selection};
use egui::SidePanel;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, warn};

/// Source paths are fixed by convention; there is no configuration surface.
pub const SOURCE_ONE: &str = "data1.csv";
pub const SOURCE_TWO: &str = "data2.csv";

/// Main application window. Selection state lives in the control panel;
/// every interaction re-runs the filter -> pivot -> scatter pipeline against
/// the cached immutable table.
pub struct DashboardApp {
    cache: TableCache,
    table: Option<Arc<UnifiedTable>>,
    load_error: Option<String>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            cache: TableCache::new(),
            table: None,
            load_error: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.load_sources();
        app
    }

    /// Load and reconcile the two sources once at startup. A failure here is
    /// fatal for the session and is surfaced immediately; there is no retry.
    fn load_sources(&mut self) {
        match self
            .cache
            .load(Path::new(SOURCE_ONE), Path::new(SOURCE_TWO))
        {
            Ok(table) => {
                self.control_panel.update_years(table.years());
                let range = table
                    .year_bounds()
                    .map(|(first, last)| format!(", years {}-{}", first, last))
                    .unwrap_or_default();
                self.control_panel
                    .set_status(&format!("Loaded {} rows{}", table.row_count(), range));
                self.table = Some(table);
                self.handle_year_changed();
            }
            Err(e) => {
                error!("source load failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Re-bound the country and indicator selectors to the new year, then
    /// re-run the pipeline.
    fn handle_year_changed(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };
        if let Some(year) = self.control_panel.selection.year {
            self.control_panel.update_bounds(
                table.countries_in_year(year),
                table.indicators_in_year(year),
            );
        } else {
            self.control_panel.update_bounds(Vec::new(), Vec::new());
        }
        self.recompute();
    }

    /// One full filter -> pivot -> scatter run for the current selection.
    fn recompute(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };
        let selection = self.control_panel.selection.clone();
        let Some(year) = selection.year else {
            self.chart_viewer
                .clear(Some("No year available in the loaded sources".to_string()));
            return;
        };
        let countries = self.control_panel.selected_country_set();

        match Self::run_pipeline(&table, year, &countries, &selection) {
            Ok((view, scatter)) => {
                let warning = scatter.is_empty().then(|| {
                    if view.is_empty() {
                        format!("No data in {} for the selected countries", year)
                    } else {
                        format!(
                            "No data for {} vs {} in {} for the selected countries",
                            selection.x_indicator, selection.y_indicator, year
                        )
                    }
                });
                match &warning {
                    Some(message) => self.control_panel.set_status(message),
                    None => self.control_panel.set_status(&format!(
                        "{} countries plotted for {}",
                        scatter.points.len(),
                        year
                    )),
                }
                self.chart_viewer.set_result(view, scatter, warning);
            }
            Err(e) => {
                warn!("pipeline failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.chart_viewer.clear(Some(format!("Error: {}", e)));
            }
        }
    }

    fn run_pipeline(
        table: &UnifiedTable,
        year: i64,
        countries: &BTreeSet<String>,
        selection: &Selection,
    ) -> anyhow::Result<(WideView, ScatterData)> {
        let rows = reduce_to_year(table.dataframe(), year)?;
        let rows = reduce_to_countries(&rows, countries)?;
        let view = pivot(&rows, "country", "indicator", "value")?;
        let scatter = ScatterData::build(
            &view,
            &selection.x_indicator,
            &selection.y_indicator,
            selection.x_scale,
            selection.y_scale,
        );
        Ok((view, scatter))
    }

    fn handle_copy_json(&mut self, ctx: &egui::Context) {
        let Some(scatter) = self.chart_viewer.scatter() else {
            self.control_panel.set_status("No points to copy");
            return;
        };
        match serde_json::to_string_pretty(&scatter.points) {
            Ok(json) => {
                ctx.output_mut(|o| o.copied_text = json);
                self.control_panel
                    .set_status("Copied scatter points to clipboard");
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::YearChanged => self.handle_year_changed(),
                        ControlPanelAction::SelectionChanged => self.recompute(),
                        ControlPanelAction::CopyJson => self.handle_copy_json(ctx),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Failed to load sources: {}", error))
                            .size(16.0)
                            .color(egui::Color32::from_rgb(220, 53, 69)),
                    );
                });
            } else {
                self.chart_viewer.show(ui);
            }
        });
    }
}
