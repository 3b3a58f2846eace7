//! Weighted-average-cost fold over a transaction sequence.
//!
//! Every unit sold reduces the cost pool proportionally; specific purchase lots
//! are not tracked.

use std::collections::BTreeMap;

use log::{debug, warn};
use rust_decimal::Decimal;

use super::positions_model::Position;
use crate::constants::DECIMAL_PRECISION;
use crate::transactions::{Transaction, TransactionType};
use crate::utils::decimal_utils::{percentage_of, round_half_up, safe_divide};

/// Running totals for one (user, asset) sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceAccumulator {
    pub bought_quantity: Decimal,
    /// Sum of `quantity * unit_price` over buys: what was actually paid.
    pub bought_cost: Decimal,
    pub sold_quantity: Decimal,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Self::new(), |mut acc, transaction| {
                acc.apply(transaction);
                acc
            })
    }

    pub fn apply(&mut self, transaction: &Transaction) {
        match transaction.transaction_type {
            TransactionType::Buy => {
                self.bought_quantity = self.bought_quantity.saturating_add(transaction.quantity);
                self.bought_cost = self.bought_cost.saturating_add(transaction.usd_amount());
            }
            TransactionType::Sell => {
                self.sold_quantity = self.sold_quantity.saturating_add(transaction.quantity);
            }
        }
    }

    pub fn remaining_quantity(&self) -> Decimal {
        self.bought_quantity - self.sold_quantity
    }

    /// `bought_cost * (remaining / bought)`, multiplied before dividing so that
    /// exact fractions stay exact. When the product does not fit in a
    /// [`Decimal`], the remaining fraction (at most one) is applied instead.
    pub fn remaining_cost_basis(&self) -> Decimal {
        let remaining = self.remaining_quantity();
        if remaining <= Decimal::ZERO || self.bought_quantity.is_zero() {
            return Decimal::ZERO;
        }
        let cost_basis = match self.bought_cost.checked_mul(remaining) {
            Some(product) => safe_divide(product, self.bought_quantity),
            None => self
                .bought_cost
                .saturating_mul(safe_divide(remaining, self.bought_quantity)),
        };
        round_half_up(cost_basis, DECIMAL_PRECISION)
    }

    /// Values the remaining holding at `current_price`.
    /// Returns `None` when nothing is held.
    pub fn into_position(self, asset_symbol: &str, current_price: Decimal) -> Option<Position> {
        let quantity = self.remaining_quantity();
        if quantity <= Decimal::ZERO {
            return None;
        }
        if self.bought_quantity.is_zero() {
            warn!(
                "{}: sold quantity {} without any buys. Ignoring sequence.",
                asset_symbol, self.sold_quantity
            );
            return None;
        }

        let cost_basis = self.remaining_cost_basis();
        let average_cost = round_half_up(safe_divide(cost_basis, quantity), DECIMAL_PRECISION);
        let current_value = quantity.saturating_mul(current_price);
        let unrealized_pnl = current_value.saturating_sub(cost_basis);
        let unrealized_pnl_percentage = percentage_of(unrealized_pnl, cost_basis);

        debug!(
            "{}: qty={} cost_basis={} avg={} value={} pnl={}",
            asset_symbol, quantity, cost_basis, average_cost, current_value, unrealized_pnl
        );

        Some(Position {
            asset_symbol: asset_symbol.to_string(),
            quantity,
            cost_basis,
            average_cost,
            current_price,
            current_value,
            unrealized_pnl,
            unrealized_pnl_percentage,
        })
    }
}

/// Folds a sequence already scoped to one user and one asset into a position.
/// Returns `None` when there is no current holding (no transactions, or fully sold).
pub fn accumulate(transactions: &[Transaction], current_price: Decimal) -> Option<Position> {
    let first = transactions.first()?;
    BalanceAccumulator::from_transactions(transactions)
        .into_position(&first.asset_symbol, current_price)
}

/// `sum(buy.quantity) - sum(sell.quantity)`, the balance a sell is checked against.
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(Transaction::signed_quantity)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Groups transactions by asset symbol, in symbol order.
pub fn group_by_symbol(transactions: Vec<Transaction>) -> BTreeMap<String, Vec<Transaction>> {
    let mut groups: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for transaction in transactions {
        groups
            .entry(transaction.asset_symbol.clone())
            .or_default()
            .push(transaction);
    }
    groups
}
