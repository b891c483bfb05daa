//! Common types and data structures

use crate::api;
use crate::constants::MAX_ACTIVITY_ENTRIES;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// Account as listed by `GET accounts/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    /// Decimal string, e.g. "1000.00000000"
    pub balance: String,
}

/// Decode a `GET accounts/` body. None if it is not a plain account list.
pub fn decode_accounts(body: &str) -> Option<Vec<Account>> {
    match serde_json::from_str::<Vec<Account>>(body) {
        Ok(accounts) => Some(accounts),
        Err(e) => {
            debug!(error = %e, "Accounts response not a plain account list");
            None
        }
    }
}

/// Body of deposit and withdraw requests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountPayload {
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "buy"),
            TradeDirection::Sell => write!(f, "sell"),
        }
    }
}

/// Trade order posted to `trading/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub account_id: u64,
    pub instrument_symbol: String,
    pub direction: TradeDirection,
    pub volume: f64,
    pub price_limit: f64,
}

/// One outgoing backend call, as shown in the activity log
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchAccounts,
    Deposit { account_id: u64, amount: f64 },
    Withdraw { account_id: u64, amount: f64 },
    ExecuteTrade { account_id: u64, symbol: String, direction: TradeDirection, volume: f64 },
}

impl ApiCall {
    pub fn method(&self) -> &'static str {
        match self {
            ApiCall::FetchAccounts => "GET",
            _ => "POST",
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            ApiCall::FetchAccounts => api::ACCOUNTS_PATH.to_string(),
            ApiCall::Deposit { account_id, .. } => api::deposit_path(*account_id),
            ApiCall::Withdraw { account_id, .. } => api::withdraw_path(*account_id),
            ApiCall::ExecuteTrade { .. } => api::TRADING_PATH.to_string(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ApiCall::FetchAccounts => "Fetch accounts".to_string(),
            ApiCall::Deposit { account_id, amount } => {
                format!("Deposit {} into #{}", amount, account_id)
            }
            ApiCall::Withdraw { account_id, amount } => {
                format!("Withdraw {} from #{}", amount, account_id)
            }
            ApiCall::ExecuteTrade { account_id, symbol, direction, volume } => {
                format!("{} {} {} on #{}", direction, volume, symbol, account_id)
            }
        }
    }
}

/// Result of a call in the activity log
#[derive(Debug, Clone, PartialEq)]
pub enum CallStatus {
    Pending,
    Succeeded(u16),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub id: u64,
    pub call: ApiCall,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub status: CallStatus,
    pub body: Option<String>,
}

impl ActivityEntry {
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

/// Shared between the UI thread and the request tasks
#[derive(Default)]
pub struct ApiState {
    pub entries: VecDeque<ActivityEntry>,
    /// Last account list decoded from a successful fetch
    pub accounts: Option<Vec<Account>>,
    pub in_flight: usize,
    next_id: u64,
}

impl ApiState {
    /// Record a new pending call and return its id
    pub fn begin(&mut self, call: ApiCall) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight += 1;
        self.entries.push_back(ActivityEntry {
            id,
            call,
            started_at: Local::now(),
            finished_at: None,
            status: CallStatus::Pending,
            body: None,
        });
        self.trim();
        id
    }

    /// Record a 2xx response. `accounts`, when decoded, replaces the account list.
    pub fn succeed(&mut self, id: u64, status: u16, body: String, accounts: Option<Vec<Account>>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(accounts) = accounts {
            self.accounts = Some(accounts);
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.status = CallStatus::Succeeded(status);
            entry.finished_at = Some(Local::now());
            entry.body = Some(body);
        }
    }

    /// Record a failed call, with the backend's response body if there was one
    pub fn fail(&mut self, id: u64, message: String, body: Option<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.status = CallStatus::Failed(message);
            entry.finished_at = Some(Local::now());
            entry.body = body;
        }
    }

    /// Drop finished entries, keep the ones still waiting on a response
    pub fn clear_finished(&mut self) {
        self.entries.retain(|e| e.status == CallStatus::Pending);
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, CallStatus::Failed(_)))
            .count()
    }

    // Pending entries are never evicted so their results still have somewhere to land
    fn trim(&mut self) {
        while self.entries.len() > MAX_ACTIVITY_ENTRIES {
            match self.entries.iter().position(|e| e.status != CallStatus::Pending) {
                Some(idx) => {
                    self.entries.remove(idx);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_direction_serializes_lowercase() {
        let trade = TradeRequest {
            account_id: 3,
            instrument_symbol: "EURUSD".into(),
            direction: TradeDirection::Sell,
            volume: 100.0,
            price_limit: 1.1,
        };
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["direction"], "sell");
        assert_eq!(json["instrument_symbol"], "EURUSD");
        assert_eq!(json["account_id"], 3);
    }

    #[test]
    fn call_reports_method_and_path() {
        assert_eq!(ApiCall::FetchAccounts.method(), "GET");
        assert_eq!(ApiCall::FetchAccounts.path(), "accounts/");

        let withdraw = ApiCall::Withdraw { account_id: 7, amount: 5.0 };
        assert_eq!(withdraw.method(), "POST");
        assert_eq!(withdraw.path(), "accounts/7/withdraw/");
    }

    #[test]
    fn successful_fetch_replaces_accounts() {
        let mut state = ApiState::default();
        let id = state.begin(ApiCall::FetchAccounts);
        assert_eq!(state.in_flight, 1);

        let body = r#"[{"id":1,"name":"Main","balance":"1000.00000000"}]"#.to_string();
        let accounts = decode_accounts(&body);
        state.succeed(id, 200, body, accounts);

        assert_eq!(state.in_flight, 0);
        let accounts = state.accounts.as_ref().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Main");
        assert_eq!(accounts[0].balance, "1000.00000000");
        assert_eq!(state.entries[0].status, CallStatus::Succeeded(200));
        assert!(state.entries[0].elapsed_ms().is_some());
    }

    #[test]
    fn undecodable_fetch_keeps_previous_accounts() {
        let mut state = ApiState::default();
        let previous = vec![Account { id: 1, name: "Old".into(), balance: "0".into() }];
        state.accounts = Some(previous.clone());

        let body = r#"{"count":0,"results":[]}"#;
        assert_eq!(decode_accounts(body), None);

        let id = state.begin(ApiCall::FetchAccounts);
        state.succeed(id, 200, body.to_string(), None);

        assert_eq!(state.accounts, Some(previous));
        assert_eq!(state.entries[0].status, CallStatus::Succeeded(200));
    }

    #[test]
    fn success_without_accounts_leaves_list_alone() {
        let mut state = ApiState::default();
        let previous = vec![Account { id: 1, name: "Main".into(), balance: "10".into() }];
        state.accounts = Some(previous.clone());

        let id = state.begin(ApiCall::Deposit { account_id: 1, amount: 10.0 });
        state.succeed(id, 200, r#"{"status":"ok"}"#.to_string(), None);

        assert_eq!(state.accounts, Some(previous));
        assert_eq!(state.entries[0].body.as_deref(), Some(r#"{"status":"ok"}"#));
    }

    #[test]
    fn failure_is_recorded_with_backend_body() {
        let mut state = ApiState::default();
        let id = state.begin(ApiCall::Withdraw { account_id: 2, amount: 50.0 });
        state.fail(
            id,
            "HTTP 400 Bad Request from http://localhost:8000/api/accounts/2/withdraw/".into(),
            Some(r#"{"error":"Insufficient funds"}"#.into()),
        );

        assert_eq!(state.in_flight, 0);
        assert_eq!(state.failed_count(), 1);
        assert!(matches!(&state.entries[0].status, CallStatus::Failed(m) if m.contains("400")));
        assert_eq!(
            state.entries[0].body.as_deref(),
            Some(r#"{"error":"Insufficient funds"}"#)
        );
    }

    #[test]
    fn log_is_bounded_and_keeps_pending() {
        let mut state = ApiState::default();
        let pending = state.begin(ApiCall::FetchAccounts);
        for _ in 0..MAX_ACTIVITY_ENTRIES + 10 {
            let id = state.begin(ApiCall::FetchAccounts);
            state.fail(id, "refused".into(), None);
        }

        assert_eq!(state.entries.len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(state.entries[0].id, pending);
        assert_eq!(state.entries[0].status, CallStatus::Pending);
    }

    #[test]
    fn clear_finished_keeps_pending() {
        let mut state = ApiState::default();
        let done = state.begin(ApiCall::FetchAccounts);
        state.succeed(done, 200, "[]".into(), Some(Vec::new()));
        let waiting = state.begin(ApiCall::FetchAccounts);

        state.clear_finished();

        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].id, waiting);
    }
}
