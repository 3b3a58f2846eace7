//! Market data module - price providers and the periodic price table refresh.

mod price_provider;
mod price_refresh_service;


pub use price_provider::{PriceProviderTrait, StaticPriceProvider};
pub use price_refresh_service::PriceRefreshService;
