//! App module - contains the main application state and logic

mod forms;
mod panels;
mod requests;

pub(crate) use forms::{CashForm, CashKind, TradeForm};

use crate::api::ApiClient;
use crate::counter::{Counter, CounterAction};
use crate::settings::Settings;
use crate::theme;
use crate::types::ApiState;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) counter: Counter,
    // Backend
    pub(crate) api: ApiClient,
    pub(crate) api_state: Arc<Mutex<ApiState>>,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Forms
    pub(crate) cash_form: CashForm,
    pub(crate) trade_form: TradeForm,
    // View
    pub(crate) show_activity_log: bool,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        api: ApiClient,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        Self {
            counter: Counter::new(),
            api,
            api_state: Arc::new(Mutex::new(ApiState::default())),
            runtime,
            cash_form: CashForm::default(),
            trade_form: TradeForm::default(),
            show_activity_log: settings.show_activity_log,
            settings,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn apply_counter_action(&mut self, action: CounterAction) {
        let value = self.counter.apply(action);
        debug!(?action, value, "Counter updated");
    }

    /// Fill both forms with an account picked from the accounts table
    pub fn select_account(&mut self, account_id: u64) {
        let id = account_id.to_string();
        self.cash_form.account_id = id.clone();
        self.trade_form.account_id = id;
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            show_activity_log: self.show_activity_log,
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }
}
