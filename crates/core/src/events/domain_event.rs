//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about data changes. Callers that push
/// notifications to clients translate them into their own transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Transactions were recorded or deleted for a user.
    TransactionsChanged {
        user_id: String,
        asset_symbols: Vec<String>,
    },

    /// The price table was refreshed.
    PricesUpdated { symbols: Vec<String> },
}

impl DomainEvent {
    /// Creates a TransactionsChanged event.
    pub fn transactions_changed(user_id: String, asset_symbols: Vec<String>) -> Self {
        Self::TransactionsChanged {
            user_id,
            asset_symbols,
        }
    }

    /// Creates a PricesUpdated event.
    pub fn prices_updated(symbols: Vec<String>) -> Self {
        Self::PricesUpdated { symbols }
    }
}
