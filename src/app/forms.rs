//! Sidebar form state and input validation
//!
//! Only checks that fields hold numbers of the right kind. Whether an amount
//! is acceptable (positive, covered by the balance) is the backend's call.

use crate::types::{TradeDirection, TradeRequest};
use crate::utils::{parse_account_id, parse_decimal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashKind {
    Deposit,
    Withdraw,
}

/// Deposit / withdraw form
#[derive(Debug, Default)]
pub struct CashForm {
    pub account_id: String,
    pub amount: String,
    pub error: Option<String>,
}

impl CashForm {
    /// Validated (account_id, amount)
    pub fn parse(&self) -> Result<(u64, f64), String> {
        let account_id = parse_account_id(&self.account_id)?;
        let amount = parse_decimal("Amount", &self.amount)?;
        Ok((account_id, amount))
    }

    /// Parsed values for a submit, storing any error on the form
    pub fn take_values(&mut self) -> Option<(u64, f64)> {
        match self.parse() {
            Ok(values) => {
                self.error = None;
                Some(values)
            }
            Err(msg) => {
                self.error = Some(msg);
                None
            }
        }
    }
}

/// Trade form
#[derive(Debug)]
pub struct TradeForm {
    pub account_id: String,
    pub symbol: String,
    /// Buy when true, sell otherwise (drives the segmented toggle)
    pub buy: bool,
    pub volume: String,
    pub price: String,
    pub error: Option<String>,
}

impl Default for TradeForm {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            symbol: String::new(),
            buy: true,
            volume: String::new(),
            price: String::new(),
            error: None,
        }
    }
}

impl TradeForm {
    pub fn direction(&self) -> TradeDirection {
        if self.buy {
            TradeDirection::Buy
        } else {
            TradeDirection::Sell
        }
    }

    pub fn parse(&self) -> Result<TradeRequest, String> {
        let account_id = parse_account_id(&self.account_id)?;
        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err("Symbol is required".into());
        }
        let volume = parse_decimal("Volume", &self.volume)?;
        let price_limit = parse_decimal("Price", &self.price)?;
        Ok(TradeRequest {
            account_id,
            instrument_symbol: symbol,
            direction: self.direction(),
            volume,
            price_limit,
        })
    }

    pub fn take_trade(&mut self) -> Option<TradeRequest> {
        match self.parse() {
            Ok(trade) => {
                self.error = None;
                Some(trade)
            }
            Err(msg) => {
                self.error = Some(msg);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cash(account_id: &str, amount: &str) -> CashForm {
        CashForm {
            account_id: account_id.into(),
            amount: amount.into(),
            error: None,
        }
    }

    #[test]
    fn cash_form_yields_account_and_amount() {
        let mut form = cash(" 3 ", "250.5");
        assert_eq!(form.take_values(), Some((3, 250.5)));
        assert!(form.error.is_none());
    }

    #[test]
    fn cash_form_reports_bad_input() {
        let mut form = cash("x", "10");
        assert!(form.take_values().is_none());
        assert_eq!(form.error.as_deref(), Some("'x' is not a valid account id"));

        form.account_id = "1".into();
        form.amount = String::new();
        assert!(form.take_values().is_none());
        assert_eq!(form.error.as_deref(), Some("Amount is required"));
    }

    #[test]
    fn error_clears_after_valid_submit() {
        let mut form = cash("", "10");
        assert!(form.take_values().is_none());
        form.account_id = "9".into();
        assert!(form.take_values().is_some());
        assert!(form.error.is_none());
    }

    #[test]
    fn trade_form_builds_request() {
        let mut form = TradeForm {
            account_id: "1".into(),
            symbol: " eurusd ".into(),
            volume: "100".into(),
            price: "1.1".into(),
            ..TradeForm::default()
        };
        let trade = form.take_trade().unwrap();
        assert_eq!(trade.instrument_symbol, "EURUSD");
        assert_eq!(trade.direction, TradeDirection::Buy);
        assert_eq!(trade.volume, 100.0);
        assert_eq!(trade.price_limit, 1.1);

        form.buy = false;
        assert_eq!(form.take_trade().unwrap().direction, TradeDirection::Sell);
    }

    #[test]
    fn trade_form_requires_every_field() {
        let mut form = TradeForm {
            account_id: "1".into(),
            volume: "100".into(),
            price: "1.1".into(),
            ..TradeForm::default()
        };
        assert!(form.take_trade().is_none());
        assert_eq!(form.error.as_deref(), Some("Symbol is required"));

        form.symbol = "EURUSD".into();
        form.volume = String::new();
        assert!(form.take_trade().is_none());
        assert_eq!(form.error.as_deref(), Some("Volume is required"));
    }
}
