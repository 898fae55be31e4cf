//! Display formatting for terminal output
//!
//! List views are rendered with `tabled`; detail views and receipts are
//! plain formatted text.

pub mod account;
pub mod deposit;
pub mod history;

pub use account::{format_account_details, format_account_list, format_owner_list};
pub use deposit::{
    format_deposit_preview, format_deposit_receipt, format_settlement, format_transfer,
    format_withdrawal,
};
pub use history::{format_audit_log, format_history};

use crate::config::settings::Settings;
use crate::models::Money;

/// Output preferences taken from the user's settings
#[derive(Debug, Clone)]
pub struct DisplayStyle {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
