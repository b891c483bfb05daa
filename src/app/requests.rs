//! Backend calls made from the UI
//!
//! Each call runs as its own task on the App's runtime. The outcome is
//! written into the shared `ApiState` and a repaint is requested; there is
//! no retry, cancellation or ordering between calls.

use super::{App, CashKind};
use crate::api::{ApiClient, ApiError};
use crate::types::{decode_accounts, ApiCall, ApiState};
use eframe::egui;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn lock(state: &Mutex<ApiState>) -> MutexGuard<'_, ApiState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record `call` in the activity log and run `send` on the runtime.
fn spawn_call<F, Fut>(
    call: ApiCall,
    api: ApiClient,
    state: Arc<Mutex<ApiState>>,
    ctx: egui::Context,
    runtime: &tokio::runtime::Runtime,
    send: F,
) -> JoinHandle<()>
where
    F: FnOnce(ApiClient) -> Fut + Send + 'static,
    Fut: Future<Output = Result<reqwest::Response, ApiError>> + Send + 'static,
{
    let id = lock(&state).begin(call.clone());
    info!(id, method = call.method(), path = %call.path(), "Sending request");
    ctx.request_repaint();

    runtime.spawn(async move {
        match send(api).await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => {
                        debug!(id, status, bytes = body.len(), "Request succeeded");
                        let accounts = match call {
                            ApiCall::FetchAccounts => decode_accounts(&body),
                            _ => None,
                        };
                        lock(&state).succeed(id, status, body, accounts);
                    }
                    Err(e) => {
                        warn!(id, status, error = %e, "Failed to read response body");
                        lock(&state).fail(id, format!("HTTP {}: {}", status, e), None);
                    }
                }
            }
            Err(e) => {
                warn!(id, status = ?e.status(), error = %e, "Request failed");
                let body = e.body().map(str::to_string);
                lock(&state).fail(id, e.to_string(), body);
            }
        }
        ctx.request_repaint();
    })
}

impl App {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, ApiState> {
        lock(&self.api_state)
    }

    fn spawn<F, Fut>(&self, ctx: &egui::Context, call: ApiCall, send: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<reqwest::Response, ApiError>> + Send + 'static,
    {
        // Outcome lands in ApiState; the handle is only awaited in tests
        let _ = spawn_call(
            call,
            self.api.clone(),
            self.api_state.clone(),
            ctx.clone(),
            &self.runtime,
            send,
        );
    }

    pub fn fetch_accounts(&mut self, ctx: &egui::Context) {
        self.spawn(ctx, ApiCall::FetchAccounts, |api| async move {
            api.fetch_accounts().await
        });
    }

    pub fn submit_cash(&mut self, ctx: &egui::Context, kind: CashKind) {
        let Some((account_id, amount)) = self.cash_form.take_values() else {
            return;
        };
        match kind {
            CashKind::Deposit => {
                let call = ApiCall::Deposit { account_id, amount };
                self.spawn(ctx, call, move |api| async move {
                    api.deposit(account_id, amount).await
                });
            }
            CashKind::Withdraw => {
                let call = ApiCall::Withdraw { account_id, amount };
                self.spawn(ctx, call, move |api| async move {
                    api.withdraw(account_id, amount).await
                });
            }
        }
    }

    pub fn submit_trade(&mut self, ctx: &egui::Context) {
        let Some(trade) = self.trade_form.take_trade() else {
            return;
        };
        let call = ApiCall::ExecuteTrade {
            account_id: trade.account_id,
            symbol: trade.instrument_symbol.clone(),
            direction: trade.direction,
            volume: trade.volume,
        };
        self.spawn(ctx, call, move |api| async move {
            api.execute_trade(&trade).await
        });
    }

    pub fn clear_activity(&mut self) {
        self.lock_state().clear_finished();
    }
}
