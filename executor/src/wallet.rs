use std::collections::HashMap;

use crate::types::{Conversion, WalletError};

/// Simulated balances for paper trading.
///
/// Only currencies registered at construction can hold a balance. Every
/// conversion is all-in: the whole `from` balance moves to `to`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperWallet {
    balances: HashMap<String, f64>,
}

impl PaperWallet {
    pub fn new<I, S>(currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            balances: currencies.into_iter().map(|c| (c.into(), 0.0)).collect(),
        }
    }

    pub fn balance(&self, currency: &str) -> Option<f64> {
        self.balances.get(currency).copied()
    }

    pub fn deposit(&mut self, currency: &str, amount: f64) -> Result<f64, WalletError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let balance = self
            .balances
            .get_mut(currency)
            .ok_or_else(|| WalletError::UnknownCurrency(currency.to_string()))?;
        *balance += amount;
        Ok(*balance)
    }

    /// Moves the entire `from` balance into `to` at `rate` units of `to`
    /// per unit of `from`.
    ///
    /// Both legs are validated and computed before either balance is
    /// written, so a failed conversion leaves the wallet untouched.
    pub fn convert_all(&mut self, from: &str, to: &str, rate: f64) -> Result<Conversion, WalletError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(WalletError::InvalidRate(rate));
        }

        let spent = self
            .balance(from)
            .ok_or_else(|| WalletError::UnknownCurrency(from.to_string()))?;
        let held = self
            .balance(to)
            .ok_or_else(|| WalletError::UnknownCurrency(to.to_string()))?;

        let received = spent * rate;

        self.balances.insert(from.to_string(), 0.0);
        self.balances.insert(to.to_string(), held + received);

        Ok(Conversion {
            from: from.to_string(),
            to: to.to_string(),
            spent,
            received,
            rate,
        })
    }

    /// Total value expressed in `quote`, pricing `base` at `price`.
    pub fn value_in(&self, base: &str, quote: &str, price: f64) -> f64 {
        self.balance(quote).unwrap_or(0.0) + self.balance(base).unwrap_or(0.0) * price
    }
}
