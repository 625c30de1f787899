pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000u128; // 1e18
pub const INITIAL_EXCHANGE_RATE: u128 = RATE_SCALE;

/// Smallest deposit accepted into a ledger with no shares outstanding.
pub const MINIMUM_FIRST_DEPOSIT: u128 = 100;
