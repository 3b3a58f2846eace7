//! Portfolio valuation: positions combined with the price table.

mod valuation_model;
mod valuation_service;
mod valuation_traits;


pub use valuation_model::{Portfolio, PortfolioSummary, PositionValuation};
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;
