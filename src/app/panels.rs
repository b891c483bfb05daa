//! Sidebar forms, accounts table and activity log

use super::{App, CashKind};
use crate::theme;
use crate::types::{ActivityEntry, CallStatus};
use crate::ui::components::{form_message, labeled_field, section_heading};
use eframe::egui;

impl App {
    // ========================================================================
    // SIDEBAR - backend calls
    // ========================================================================

    pub(crate) fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let in_flight = self.lock_state().in_flight;

        ui.add_space(theme::SPACING_XL);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::PLUGS_CONNECTED)
                    .size(theme::FONT_BODY)
                    .color(theme::ACCENT),
            );
            ui.label(
                egui::RichText::new(self.api.base_url().as_str())
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
            if in_flight > 0 {
                ui.spinner();
            }
        });
        ui.add_space(theme::SPACING_LG);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // ACCOUNTS
                theme::section_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    section_heading(ui, "ACCOUNTS");
                    let label = format!("{}  Fetch Accounts", egui_phosphor::regular::ARROWS_CLOCKWISE);
                    if ui
                        .add(theme::button_accent(label).min_size(egui::vec2(
                            ui.available_width(),
                            theme::BUTTON_HEIGHT,
                        )))
                        .clicked()
                    {
                        self.fetch_accounts(&ctx);
                    }
                });

                ui.add_space(theme::SPACING_MD);

                // CASH
                theme::section_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    section_heading(ui, "CASH");
                    labeled_field(ui, "Account ID", &mut self.cash_form.account_id, "e.g. 1");
                    labeled_field(ui, "Amount", &mut self.cash_form.amount, "e.g. 1000");
                    ui.add_space(theme::SPACING_SM);
                    ui.horizontal(|ui| {
                        let half = (ui.available_width() - theme::SPACING_MD) / 2.0;
                        let size = egui::vec2(half, theme::BUTTON_HEIGHT);
                        let deposit = format!("{}  Deposit", egui_phosphor::regular::ARROW_DOWN);
                        if ui.add(theme::button_accent(deposit).min_size(size)).clicked() {
                            self.submit_cash(&ctx, CashKind::Deposit);
                        }
                        let withdraw = format!("{}  Withdraw", egui_phosphor::regular::ARROW_UP);
                        if ui.add(theme::button_danger(withdraw).min_size(size)).clicked() {
                            self.submit_cash(&ctx, CashKind::Withdraw);
                        }
                    });
                    form_message(ui, self.cash_form.error.as_deref());
                });

                ui.add_space(theme::SPACING_MD);

                // TRADE
                theme::section_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        section_heading(ui, "TRADE");
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            theme::segmented_toggle(ui, "Buy", "Sell", &mut self.trade_form.buy);
                        });
                    });
                    ui.add_space(theme::SPACING_SM);
                    labeled_field(ui, "Account ID", &mut self.trade_form.account_id, "e.g. 1");
                    labeled_field(ui, "Symbol", &mut self.trade_form.symbol, "e.g. EURUSD");
                    labeled_field(ui, "Volume", &mut self.trade_form.volume, "e.g. 100");
                    labeled_field(ui, "Price", &mut self.trade_form.price, "e.g. 1.1");
                    ui.add_space(theme::SPACING_SM);
                    let label = format!(
                        "{}  Execute {}",
                        egui_phosphor::regular::CHART_LINE_UP,
                        if self.trade_form.buy { "Buy" } else { "Sell" }
                    );
                    if ui
                        .add(theme::button_accent(label).min_size(egui::vec2(
                            ui.available_width(),
                            theme::BUTTON_HEIGHT,
                        )))
                        .clicked()
                    {
                        self.submit_trade(&ctx);
                    }
                    form_message(ui, self.trade_form.error.as_deref());
                });

                ui.add_space(theme::SPACING_MD);
                ui.checkbox(&mut self.show_activity_log, "Show activity log");
            });
    }

    // ========================================================================
    // ACCOUNTS TABLE
    // ========================================================================

    pub(crate) fn render_accounts(&mut self, ui: &mut egui::Ui) {
        use egui_extras::{Column, TableBuilder};

        section_heading(ui, "ACCOUNTS");

        let accounts = self.lock_state().accounts.clone();
        let Some(accounts) = accounts else {
            ui.label(
                egui::RichText::new("No accounts loaded yet. Use Fetch Accounts in the sidebar.")
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            );
            return;
        };
        if accounts.is_empty() {
            ui.label(
                egui::RichText::new("The backend returned no accounts.")
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            );
            return;
        }

        let mut picked = None;
        TableBuilder::new(ui)
            .id_salt("accounts_table")
            .striped(true)
            .resizable(false)
            .sense(egui::Sense::click())
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .max_scroll_height(180.0)
            .column(Column::exact(60.0))
            .column(Column::remainder().at_least(120.0))
            .column(Column::exact(160.0))
            .header(24.0, |mut header| {
                for title in ["ID", "NAME", "BALANCE"] {
                    header.col(|ui| {
                        ui.label(
                            egui::RichText::new(title)
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                }
            })
            .body(|body| {
                body.rows(26.0, accounts.len(), |mut row| {
                    let account = &accounts[row.index()];
                    row.col(|ui| {
                        ui.label(format!("#{}", account.id));
                    });
                    row.col(|ui| {
                        ui.label(&account.name);
                    });
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(&account.balance)
                                .monospace()
                                .color(theme::TEXT_SECONDARY),
                        );
                    });
                    if row.response().clicked() {
                        picked = Some(account.id);
                    }
                });
            });

        if let Some(id) = picked {
            self.select_account(id);
        }
    }

    // ========================================================================
    // ACTIVITY LOG
    // ========================================================================

    pub(crate) fn render_activity_log(&mut self, ui: &mut egui::Ui) {
        let (entries, failed) = {
            let state = self.lock_state();
            (state.entries.clone(), state.failed_count())
        };

        ui.horizontal(|ui| {
            section_heading(ui, "ACTIVITY");
            if failed > 0 {
                ui.label(
                    egui::RichText::new(format!("{} failed", failed))
                        .size(theme::FONT_SMALL)
                        .color(theme::STATUS_ERROR),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::button("Clear")).clicked() {
                    self.clear_activity();
                }
            });
        });

        if entries.is_empty() {
            ui.label(
                egui::RichText::new("No requests sent yet.")
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            );
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("activity_log")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &entries {
                    activity_row(ui, entry);
                }
            });
    }
}

fn activity_row(ui: &mut egui::Ui, entry: &ActivityEntry) {
    let color = theme::status_color(&entry.status);
    let status_text = match &entry.status {
        CallStatus::Pending => "…".to_string(),
        CallStatus::Succeeded(code) => code.to_string(),
        CallStatus::Failed(_) => "ERR".to_string(),
    };

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(entry.started_at.format("%H:%M:%S").to_string())
                .monospace()
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_DIM),
        );
        ui.label(
            egui::RichText::new(status_text)
                .monospace()
                .size(theme::FONT_SMALL)
                .color(color),
        );
        ui.label(
            egui::RichText::new(format!("{} {}", entry.call.method(), entry.call.path()))
                .monospace()
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_SECONDARY),
        );
        ui.label(
            egui::RichText::new(entry.call.summary())
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_MUTED),
        );
        if let Some(ms) = entry.elapsed_ms() {
            ui.label(
                egui::RichText::new(format!("{} ms", ms))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
        }
    });

    if let CallStatus::Failed(msg) = &entry.status {
        ui.label(
            egui::RichText::new(msg)
                .size(theme::FONT_SMALL)
                .color(theme::STATUS_ERROR),
        );
    }
    // Failed entries only carry a body when the backend sent one with its rejection
    if let Some(body) = entry.body.as_deref().filter(|b| !b.is_empty()) {
        let (title, open) = match entry.status {
            CallStatus::Failed(_) => ("Backend response", true),
            _ => ("Response", false),
        };
        egui::CollapsingHeader::new(
            egui::RichText::new(title).size(theme::FONT_SMALL).color(theme::TEXT_DIM),
        )
        .id_salt(("activity_body", entry.id))
        .default_open(open)
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(body)
                    .monospace()
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_MUTED),
            );
        });
    }
    ui.add_space(theme::SPACING_SM);
}
