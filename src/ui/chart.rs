use crate::query::{ChartData, ChartKind};
use crate::theme::Theme;
use eframe::egui::{self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, RichText, Sense, Stroke};
use std::f32::consts::{FRAC_PI_2, TAU};

const PLOT_HEIGHT: f32 = 190.0;
const AXIS_GUTTER: f32 = 34.0;
const LABEL_GUTTER: f32 = 30.0;
const MAX_LABEL_CHARS: usize = 10;

/// Upper bound of the value axis: the chart's fixed maximum, otherwise the
/// largest value plus headroom.
pub fn value_ceiling(chart: &ChartData) -> f64 {
    if let Some(max) = chart.y_max {
        return max.max(1.0);
    }
    let largest = chart
        .series
        .iter()
        .flat_map(|series| series.values.iter().copied())
        .fold(0.0_f64, f64::max);
    if largest <= 0.0 {
        1.0
    } else {
        largest * 1.1
    }
}

/// Start and end angle of each slice, clockwise from twelve o'clock.
/// Empty when nothing is positive.
pub fn slice_angles(values: &[f64]) -> Vec<(f32, f32)> {
    let total: f64 = values.iter().filter(|value| **value > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|value| {
            let sweep = (value.max(0.0) / total) as f32 * TAU;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut out = label.chars().take(MAX_LABEL_CHARS - 1).collect::<String>();
    out.push('…');
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn render_chart(ui: &mut egui::Ui, theme: &Theme, chart: &ChartData) {
    let colors = (0..chart.labels.len().max(chart.series.len()))
        .map(|index| theme.series_color(index))
        .collect::<Vec<_>>();
    render_chart_with_colors(ui, theme, chart, &colors);
}

/// `colors` is indexed per label for single-series bar and pie charts and per
/// series otherwise.
pub fn render_chart_with_colors(
    ui: &mut egui::Ui,
    theme: &Theme,
    chart: &ChartData,
    colors: &[Color32],
) {
    let color_at = |index: usize| {
        colors
            .get(index)
            .copied()
            .unwrap_or_else(|| theme.series_color(index))
    };

    ui.label(RichText::new(&chart.title).strong().color(theme.text_primary));
    if chart.labels.is_empty() {
        ui.label(RichText::new("No data to chart.").color(theme.text_muted));
        return;
    }

    match chart.kind {
        ChartKind::Bar => draw_bars(ui, theme, chart, &color_at),
        ChartKind::Line => draw_lines(ui, theme, chart, &color_at),
        ChartKind::Pie => draw_pie(ui, theme, chart, &color_at, false),
        ChartKind::Doughnut => draw_pie(ui, theme, chart, &color_at, true),
    }

    if let Some(axis) = &chart.y_axis_title {
        ui.label(RichText::new(axis).small().color(theme.text_muted));
    }
}

fn plot_area(ui: &mut egui::Ui) -> (Rect, egui::Painter) {
    let width = ui.available_width().max(160.0);
    let (rect, _response) =
        ui.allocate_exact_size(egui::vec2(width, PLOT_HEIGHT + LABEL_GUTTER), Sense::hover());
    (rect, ui.painter_at(rect))
}

fn plot_rect(outer: Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(outer.left() + AXIS_GUTTER, outer.top() + 8.0),
        Pos2::new(outer.right() - 4.0, outer.bottom() - LABEL_GUTTER),
    )
}

fn draw_axes(painter: &egui::Painter, theme: &Theme, plot: Rect, ceiling: f64) {
    let font = FontId::proportional(10.0);
    for step in 0..=4 {
        let fraction = step as f32 / 4.0;
        let y = plot.bottom() - plot.height() * fraction;
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, theme.border_subtle),
        );
        painter.text(
            Pos2::new(plot.left() - 4.0, y),
            Align2::RIGHT_CENTER,
            format_value(ceiling * f64::from(fraction)),
            font.clone(),
            theme.text_muted,
        );
    }
}

fn draw_category_labels(painter: &egui::Painter, theme: &Theme, plot: Rect, labels: &[String]) {
    let slot = plot.width() / labels.len() as f32;
    for (index, label) in labels.iter().enumerate() {
        let x = plot.left() + slot * (index as f32 + 0.5);
        painter.text(
            Pos2::new(x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            short_label(label),
            FontId::proportional(10.0),
            theme.text_muted,
        );
    }
}

fn draw_bars(
    ui: &mut egui::Ui,
    theme: &Theme,
    chart: &ChartData,
    color_at: &dyn Fn(usize) -> Color32,
) {
    let (outer, painter) = plot_area(ui);
    let plot = plot_rect(outer);
    let ceiling = value_ceiling(chart);
    draw_axes(&painter, theme, plot, ceiling);

    let series_count = chart.series.len().max(1);
    let slot = plot.width() / chart.labels.len() as f32;
    let bar_width = (slot * 0.7) / series_count as f32;

    for (series_index, series) in chart.series.iter().enumerate() {
        for (index, value) in series.values.iter().enumerate() {
            let height = (value.max(0.0) / ceiling).min(1.0) as f32 * plot.height();
            let left = plot.left() + slot * index as f32 + slot * 0.15 + bar_width * series_index as f32;
            let bar = Rect::from_min_max(
                Pos2::new(left, plot.bottom() - height),
                Pos2::new(left + bar_width - 2.0, plot.bottom()),
            );
            let color = if chart.series.len() == 1 {
                color_at(index)
            } else {
                color_at(series_index)
            };
            painter.rect_filled(bar, CornerRadius::same(3), color);
            painter.text(
                Pos2::new(bar.center().x, bar.top() - 2.0),
                Align2::CENTER_BOTTOM,
                format_value(*value),
                FontId::proportional(10.0),
                theme.text_primary,
            );
        }
    }
    draw_category_labels(&painter, theme, plot, &chart.labels);

    if chart.series.len() > 1 {
        series_legend(ui, theme, chart, color_at);
    }
}

fn draw_lines(
    ui: &mut egui::Ui,
    theme: &Theme,
    chart: &ChartData,
    color_at: &dyn Fn(usize) -> Color32,
) {
    let (outer, painter) = plot_area(ui);
    let plot = plot_rect(outer);
    let ceiling = value_ceiling(chart);
    draw_axes(&painter, theme, plot, ceiling);

    let slot = plot.width() / chart.labels.len() as f32;
    for (series_index, series) in chart.series.iter().enumerate() {
        let color = color_at(series_index);
        let points = series
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let height = (value.max(0.0) / ceiling).min(1.0) as f32 * plot.height();
                Pos2::new(plot.left() + slot * (index as f32 + 0.5), plot.bottom() - height)
            })
            .collect::<Vec<_>>();
        for point in &points {
            painter.circle_filled(*point, 3.0, color);
        }
        painter.add(egui::Shape::line(points, Stroke::new(2.0, color)));
    }
    draw_category_labels(&painter, theme, plot, &chart.labels);

    if chart.series.len() > 1 {
        series_legend(ui, theme, chart, color_at);
    }
}

fn draw_pie(
    ui: &mut egui::Ui,
    theme: &Theme,
    chart: &ChartData,
    color_at: &dyn Fn(usize) -> Color32,
    hollow: bool,
) {
    let values = chart.first_series();
    let side = PLOT_HEIGHT.min(ui.available_width());
    let (rect, _response) = ui.allocate_exact_size(egui::vec2(side, side), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = side * 0.45;

    let slices = slice_angles(values);
    if slices.is_empty() {
        painter.circle_stroke(center, radius, Stroke::new(1.0, theme.border_subtle));
    }
    for (index, (start, end)) in slices.iter().enumerate() {
        let sweep = end - start;
        if sweep <= 0.0 {
            continue;
        }
        // Convex fans: split each slice into pieces narrower than a quarter turn.
        let pieces = (sweep / 0.25).ceil().max(1.0) as usize;
        let step = sweep / pieces as f32;
        for piece in 0..pieces {
            let from = start + step * piece as f32;
            let mut fan = vec![center];
            for tick in 0..=4 {
                let angle = from + step * tick as f32 / 4.0;
                fan.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
            }
            painter.add(egui::Shape::convex_polygon(fan, color_at(index), Stroke::NONE));
        }
    }
    if hollow {
        painter.circle_filled(center, radius * 0.55, theme.surface_2);
    }

    ui.horizontal_wrapped(|ui| {
        for (index, label) in chart.labels.iter().enumerate() {
            let value = values.get(index).copied().unwrap_or_default();
            ui.colored_label(color_at(index), "■");
            ui.label(
                RichText::new(format!("{label} ({})", format_value(value)))
                    .small()
                    .color(theme.text_muted),
            );
        }
    });
}

fn series_legend(
    ui: &mut egui::Ui,
    theme: &Theme,
    chart: &ChartData,
    color_at: &dyn Fn(usize) -> Color32,
) {
    ui.horizontal_wrapped(|ui| {
        for (index, series) in chart.series.iter().enumerate() {
            ui.colored_label(color_at(index), "■");
            ui.label(RichText::new(&series.label).small().color(theme.text_muted));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{short_label, slice_angles, value_ceiling};
    use crate::query::{ChartData, ChartKind};
    use std::f32::consts::{FRAC_PI_2, TAU};

    fn points(values: &[f64]) -> Vec<(String, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| (format!("L{index}"), *value))
            .collect()
    }

    #[test]
    fn ceiling_prefers_fixed_maximum() {
        let chart = ChartData::new(ChartKind::Bar, "rates")
            .with_series("rate", points(&[20.0, 80.0]))
            .with_y_max(100.0);
        assert_eq!(value_ceiling(&chart), 100.0);
    }

    #[test]
    fn ceiling_adds_headroom_and_never_hits_zero() {
        let chart = ChartData::new(ChartKind::Line, "volume").with_series("n", points(&[4.0, 10.0]));
        assert!((value_ceiling(&chart) - 11.0).abs() < 1e-9);

        let flat = ChartData::new(ChartKind::Bar, "empty").with_series("n", points(&[0.0, 0.0]));
        assert_eq!(value_ceiling(&flat), 1.0);
    }

    #[test]
    fn slices_cover_the_full_circle_in_order() {
        let slices = slice_angles(&[1.0, 3.0]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].0 + FRAC_PI_2).abs() < 1e-6);
        assert!((slices[0].1 - slices[1].0).abs() < 1e-6);
        assert!((slices[1].1 - slices[0].0 - TAU).abs() < 1e-5);
        assert!(((slices[1].1 - slices[1].0) - 3.0 * (slices[0].1 - slices[0].0)).abs() < 1e-5);
    }

    #[test]
    fn all_zero_values_have_no_slices() {
        assert!(slice_angles(&[0.0, 0.0]).is_empty());
        assert!(slice_angles(&[]).is_empty());
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("CRIM"), "CRIM");
        assert_eq!(short_label("Discrepancy Found"), "Discrepan…");
    }
}
