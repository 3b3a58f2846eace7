/// Scale used when rounding derived ratios (average cost, cost basis shares)
pub const DECIMAL_PRECISION: u32 = 20;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for percentages
pub const PERCENTAGE_PRECISION: u32 = 4;

/// Default interval between two price cache refreshes
pub const DEFAULT_PRICE_REFRESH_SECS: u64 = 60;

/// Default location of the SQLite database file
pub const DEFAULT_DB_PATH: &str = "./db/coinfolio.db";
