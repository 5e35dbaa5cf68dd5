use crate::query::response::cell_text;
use crate::query::TableData;
use crate::theme::Theme;
use crate::ui::chart;
use crate::ui::event::WidgetAction;
use crate::ui::workspace::{CanvasWidget, WidgetData};
use eframe::egui::{self, RichText, ScrollArea};

pub const EMPTY_WORKSPACE: &str = "Your workspace is empty.";

/// Draws workspace widgets as cards and reports button clicks.
pub struct WidgetRenderer {
    max_table_rows: usize,
}

impl Default for WidgetRenderer {
    fn default() -> Self {
        Self { max_table_rows: 50 }
    }
}

impl WidgetRenderer {
    pub fn render_workspace(
        &self,
        widgets: &[CanvasWidget],
        ui: &mut egui::Ui,
        theme: &Theme,
        emit: &mut dyn FnMut(WidgetAction),
    ) {
        if widgets.is_empty() {
            ui.add_space(theme.spacing_24);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(EMPTY_WORKSPACE).color(theme.text_muted));
                ui.label(
                    RichText::new("Tables and charts from your questions will appear here.")
                        .small()
                        .color(theme.text_muted),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .id_salt("workspace_widgets")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for widget in widgets {
                    self.render_widget(widget, ui, theme, emit);
                    ui.add_space(theme.spacing_12);
                }
            });
    }

    pub fn render_widget(
        &self,
        widget: &CanvasWidget,
        ui: &mut egui::Ui,
        theme: &Theme,
        emit: &mut dyn FnMut(WidgetAction),
    ) {
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&widget.title).strong().color(theme.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new("✕").stroke(theme.subtle_button_stroke()))
                        .on_hover_text("Remove")
                        .clicked()
                    {
                        emit(WidgetAction::Remove {
                            widget_id: widget.id.clone(),
                        });
                    }
                    if widget.can_compare()
                        && ui
                            .add(egui::Button::new("Compare").stroke(theme.subtle_button_stroke()))
                            .clicked()
                    {
                        emit(WidgetAction::Compare {
                            widget_id: widget.id.clone(),
                        });
                    }
                });
            });
            ui.label(
                RichText::new(format!(
                    "{} · {}",
                    widget.kind().as_str(),
                    widget.created_at.format("%Y-%m-%d %H:%M")
                ))
                .small()
                .color(theme.text_muted),
            );
            ui.add_space(theme.spacing_8);
            self.render_data(&widget.data, &widget.id, ui, theme);
        });
    }

    fn render_data(&self, data: &WidgetData, id_salt: &str, ui: &mut egui::Ui, theme: &Theme) {
        match data {
            WidgetData::Table(table) => self.render_table(table, id_salt, ui, theme),
            WidgetData::Chart(chart) => chart::render_chart(ui, theme, chart),
            WidgetData::Text(text) => {
                ui.label(RichText::new(text).color(theme.text_primary));
            }
            WidgetData::Comparison {
                source_query,
                source,
                result,
                ..
            } => {
                ui.columns(2, |columns| {
                    columns[0].label(
                        RichText::new(format!("Original: {source_query}"))
                            .small()
                            .color(theme.text_muted),
                    );
                    self.render_data(source, &format!("{id_salt}_source"), &mut columns[0], theme);
                    columns[1].label(RichText::new("Comparison").small().color(theme.text_muted));
                    self.render_data(result, &format!("{id_salt}_result"), &mut columns[1], theme);
                });
            }
        }
    }

    pub fn render_table(&self, table: &TableData, id_salt: &str, ui: &mut egui::Ui, theme: &Theme) {
        if table.is_empty() {
            ui.label(RichText::new("No rows.").color(theme.text_muted));
            return;
        }
        let risk_column = table.column_index("Risk Level");

        ScrollArea::horizontal()
            .id_salt(format!("{id_salt}_table_scroll"))
            .show(ui, |ui| {
                egui::Grid::new(format!("{id_salt}_table"))
                    .striped(true)
                    .spacing(egui::vec2(theme.spacing_12, theme.spacing_4))
                    .show(ui, |ui| {
                        for header in &table.headers {
                            ui.label(RichText::new(header).strong().color(theme.text_primary));
                        }
                        ui.end_row();

                        for row in table.rows.iter().take(self.max_table_rows) {
                            for (column, value) in row.iter().enumerate() {
                                let text = cell_text(value);
                                let color = risk_column
                                    .filter(|risk| *risk == column)
                                    .and_then(|_| theme.risk_color(&text))
                                    .unwrap_or(theme.text_primary);
                                ui.label(RichText::new(text).color(color));
                            }
                            ui.end_row();
                        }
                    });
            });

        if table.rows.len() > self.max_table_rows {
            ui.label(
                RichText::new(format!(
                    "Showing {} of {} rows.",
                    self.max_table_rows,
                    table.rows.len()
                ))
                .small()
                .color(theme.text_muted),
            );
        }
    }
}

/// Label for the workspace toggle.
pub fn workspace_badge(widgets: &[CanvasWidget]) -> String {
    match widgets.len() {
        0 => "Workspace".to_string(),
        total => format!("Workspace ({total})"),
    }
}
