//! Control Panel Widget
//! Left side panel with the year, country, indicator and axis-scale selectors.

use crate::charts::AxisScale;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::collections::BTreeSet;

/// Selection parameters for one interaction. The panel owns the mutable
/// widget state; the pipeline only ever sees a clone of this.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub year: Option<i64>,
    pub x_indicator: String,
    pub y_indicator: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
}

/// Left side control panel bound to what the unified table actually holds.
pub struct ControlPanel {
    pub selection: Selection,
    pub years: Vec<i64>,
    pub countries: Vec<String>,
    pub selected_countries: Vec<bool>,
    pub indicators: Vec<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            years: Vec::new(),
            countries: Vec::new(),
            selected_countries: Vec::new(),
            indicators: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selectable years after a table (re)build.
    pub fn update_years(&mut self, years: Vec<i64>) {
        if let Some(current) = self.selection.year {
            if !years.contains(&current) {
                self.selection.year = None;
            }
        }
        if self.selection.year.is_none() {
            self.selection.year = years.first().copied();
        }
        self.years = years;
    }

    /// Bound the country and indicator selectors to the selected year.
    /// Countries default to all selected; indicator choices survive a year
    /// change when still present.
    pub fn update_bounds(&mut self, countries: Vec<String>, indicators: Vec<String>) {
        self.selected_countries = vec![true; countries.len()];
        self.countries = countries;

        if !indicators.contains(&self.selection.x_indicator) {
            self.selection.x_indicator = indicators.first().cloned().unwrap_or_default();
        }
        if !indicators.contains(&self.selection.y_indicator) {
            self.selection.y_indicator = indicators
                .get(1)
                .or_else(|| indicators.first())
                .cloned()
                .unwrap_or_default();
        }
        self.indicators = indicators;
    }

    /// Currently checked countries.
    pub fn selected_country_set(&self) -> BTreeSet<String> {
        self.countries
            .iter()
            .zip(self.selected_countries.iter())
            .filter(|(_, &selected)| selected)
            .map(|(country, _)| country.clone())
            .collect()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Indicator Dash")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Country Indicator Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Year Section =====
        ui.label(RichText::new("📅 Year").size(14.0).strong());
        ui.add_space(5.0);

        let year_text = self
            .selection
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "No years available".to_string());
        ComboBox::from_id_salt("year")
            .width(150.0)
            .selected_text(year_text)
            .show_ui(ui, |ui| {
                for &year in &self.years {
                    if ui
                        .selectable_label(self.selection.year == Some(year), year.to_string())
                        .clicked()
                        && self.selection.year != Some(year)
                    {
                        self.selection.year = Some(year);
                        action = ControlPanelAction::YearChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🗺 Countries").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    for (i, country) in self.countries.iter().enumerate() {
                        if i < self.selected_countries.len()
                            && ui
                                .checkbox(&mut self.selected_countries[i], country)
                                .changed()
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_countries.iter_mut().for_each(|v| *v = true);
                action = ControlPanelAction::SelectionChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_countries.iter_mut().for_each(|v| *v = false);
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Indicator Section =====
        ui.label(RichText::new("📈 Indicators").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("X Indicator:"));
            ComboBox::from_id_salt("x_indicator")
                .width(combo_width)
                .selected_text(&self.selection.x_indicator)
                .show_ui(ui, |ui| {
                    for indicator in &self.indicators {
                        if ui
                            .selectable_label(self.selection.x_indicator == *indicator, indicator)
                            .clicked()
                        {
                            self.selection.x_indicator = indicator.clone();
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Y Indicator:"));
            ComboBox::from_id_salt("y_indicator")
                .width(combo_width)
                .selected_text(&self.selection.y_indicator)
                .show_ui(ui, |ui| {
                    for indicator in &self.indicators {
                        if ui
                            .selectable_label(self.selection.y_indicator == *indicator, indicator)
                            .clicked()
                        {
                            self.selection.y_indicator = indicator.clone();
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(10.0);

        // ===== Axis Scale Section =====
        ui.label(RichText::new("⚖ Axis Scale").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("X Axis:"));
            if ui
                .radio_value(&mut self.selection.x_scale, AxisScale::Linear, "Linear")
                .changed()
                | ui.radio_value(&mut self.selection.x_scale, AxisScale::Log, "Log")
                    .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        });
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Y Axis:"));
            if ui
                .radio_value(&mut self.selection.y_scale, AxisScale::Linear, "Linear")
                .changed()
                | ui.radio_value(&mut self.selection.y_scale, AxisScale::Log, "Log")
                    .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Actions =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("📋 Copy Points as JSON").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::CopyJson;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") || self.status.contains("Failed") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("No data") {
            Color32::from_rgb(255, 193, 7)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    YearChanged,
    SelectionChanged,
    CopyJson,
}
