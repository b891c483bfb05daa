//! Reusable UI components
//!
//! Standalone widgets that only know about the state handed to them.

use crate::counter::{Counter, CounterAction};
use crate::theme;
use eframe::egui;

/// Counter card: title, current value, increase/decrease buttons.
/// Returns the button that was clicked this frame, if any.
pub fn counter_card(ui: &mut egui::Ui, counter: &Counter) -> Option<CounterAction> {
    let mut action = None;

    ui.add(
        egui::Label::new(
            egui::RichText::new("Trading App - Counter")
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        )
        .selectable(false),
    );
    ui.add_space(theme::SPACING_LG);

    theme::card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Current Count:")
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            );
            ui.label(
                egui::RichText::new(counter.value().to_string())
                    .size(theme::FONT_COUNT)
                    .strong()
                    .color(theme::ACCENT),
            );
        });

        ui.add_space(theme::SPACING_MD);

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = theme::COUNTER_BUTTON_GAP;
            let size = egui::vec2(140.0, theme::BUTTON_HEIGHT);
            let increase = format!("{}  Increase Count", egui_phosphor::regular::PLUS);
            if ui.add(theme::button_accent(increase).min_size(size)).clicked() {
                action = Some(CounterAction::Increase);
            }
            let decrease = format!("{}  Decrease Count", egui_phosphor::regular::MINUS);
            if ui.add(theme::button(decrease).min_size(size)).clicked() {
                action = Some(CounterAction::Decrease);
            }
        });
    });

    ui.add_space(theme::SPACING_MD);
    ui.label(
        egui::RichText::new(
            "Notice how the number changes without restarting the app? That's UI state!",
        )
        .size(theme::FONT_LABEL)
        .italics()
        .color(theme::TEXT_DIM),
    );

    action
}

/// Small caps section heading, as used in the sidebar
pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .color(theme::TEXT_DIM)
                .size(theme::FONT_SMALL),
        )
        .selectable(false),
    );
    ui.add_space(theme::SPACING_SM);
}

/// Label above a single-line text field. Returns the field response.
pub fn labeled_field(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut String,
    hint: &str,
) -> egui::Response {
    ui.label(
        egui::RichText::new(label)
            .size(theme::FONT_LABEL)
            .color(theme::TEXT_MUTED),
    );
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(ui.available_width()),
    )
}

/// Inline message under a form, red for errors
pub fn form_message(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(msg) = message {
        ui.add_space(theme::SPACING_SM);
        ui.label(
            egui::RichText::new(format!("{}  {}", egui_phosphor::regular::WARNING, msg))
                .size(theme::FONT_LABEL)
                .color(theme::STATUS_ERROR),
        );
    }
}
