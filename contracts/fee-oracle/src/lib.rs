#![no_std]
use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, panic_with_error, Address,
    Env,
};

pub const SCALE_1E6: u128 = 1_000_000u128;
pub const BPS_DENOMINATOR: u128 = 10_000u128;
const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[soroban_sdk::contractclient(name = "PriceQuoteClient")]
pub trait PriceQuote {
    fn quote(env: Env, asset_in: Address, asset_out: Address, amount_in: u128) -> u128;
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OracleError {
    InvalidConfig = 1,
    PriceUnavailable = 2,
    MathOverflow = 3,
}

#[contracttype]
pub enum DataKey {
    Config,
}

/// Fixed pricing parameters. There is no setter: a different formula or
/// market means deploying another oracle and pointing the pool at it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Market consulted for the spot quote.
    pub market: Address,
    /// Asset every quote is denominated in.
    pub reference_asset: Address,
    /// Fee at par, in basis points of the loan.
    pub base_fee_bps: u32,
    /// Expected quote for `price_probe` units of the asset at par.
    pub par_price: u128,
    /// Widest accepted distance of the spot price from par, in basis points.
    /// Quotes outside the band are refused, so a trade placed right before a
    /// loan can cut the fee by at most a factor of `10_000 / (10_000 + band)`.
    pub max_deviation_bps: u32,
    /// Size of the quote used to read the spot price.
    pub price_probe: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfigured {
    #[topic]
    pub market: Address,
    #[topic]
    pub reference_asset: Address,
    pub base_fee_bps: u32,
    pub par_price: u128,
    pub max_deviation_bps: u32,
    pub price_probe: u128,
}

#[contract]
pub struct FeeOracle;

#[contractimpl]
impl FeeOracle {
    pub fn __constructor(env: Env, config: FeeConfig) {
        if (config.base_fee_bps as u128) > BPS_DENOMINATOR
            || config.max_deviation_bps == 0
            || (config.max_deviation_bps as u128) >= BPS_DENOMINATOR
            || config.par_price == 0
            || config.price_probe == 0
        {
            panic_with_error!(&env, OracleError::InvalidConfig);
        }
        env.storage().instance().set(&DataKey::Config, &config);
        bump_ttl(&env);
        OracleConfigured {
            market: config.market,
            reference_asset: config.reference_asset,
            base_fee_bps: config.base_fee_bps,
            par_price: config.par_price,
            max_deviation_bps: config.max_deviation_bps,
            price_probe: config.price_probe,
        }
        .publish(&env);
    }

    pub fn config(env: Env) -> FeeConfig {
        read_config(&env)
    }

    /// Current spot multiplier for `asset`, scaled 1e6. Never below 1e6, and
    /// only defined while the spot price is inside the deviation band.
    pub fn price_multiplier(env: Env, asset: Address) -> u128 {
        let config = read_config(&env);
        observed_multiplier(&env, &config, &asset)
    }

    /// Fee owed on a flash loan of `amount`. Rounds up, so any non-zero loan
    /// with a non-zero base rate pays at least one unit.
    pub fn calculate_fee(env: Env, asset: Address, amount: u128) -> u128 {
        if amount == 0 {
            return 0;
        }
        let config = read_config(&env);
        let multiplier = observed_multiplier(&env, &config, &asset);
        fee_for(&env, amount, config.base_fee_bps, multiplier)
    }
}

fn observed_multiplier(env: &Env, config: &FeeConfig, asset: &Address) -> u128 {
    if *asset == config.reference_asset {
        return SCALE_1E6;
    }
    let observed = PriceQuoteClient::new(env, &config.market).quote(
        asset,
        &config.reference_asset,
        &config.price_probe,
    );
    if observed == 0 {
        panic_with_error!(env, OracleError::PriceUnavailable);
    }
    let ratio = observed
        .checked_mul(SCALE_1E6)
        .unwrap_or_else(|| panic_with_error!(env, OracleError::MathOverflow))
        / config.par_price;
    let band = config.max_deviation_bps as u128 * SCALE_1E6 / BPS_DENOMINATOR;
    if ratio > SCALE_1E6 + band || ratio < SCALE_1E6 - band {
        panic_with_error!(env, OracleError::PriceUnavailable);
    }
    // A trade that cheapens the asset can only drag the fee down to par.
    ratio.max(SCALE_1E6)
}

fn fee_for(env: &Env, amount: u128, base_fee_bps: u32, multiplier: u128) -> u128 {
    let numerator = amount
        .checked_mul(base_fee_bps as u128)
        .and_then(|v| v.checked_mul(multiplier))
        .unwrap_or_else(|| panic_with_error!(env, OracleError::MathOverflow));
    let denominator = BPS_DENOMINATOR * SCALE_1E6;
    numerator.div_ceil(denominator)
}

fn read_config(env: &Env) -> FeeConfig {
    bump_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| panic_with_error!(env, OracleError::InvalidConfig))
}

fn bump_ttl(env: &Env) {
    if env.storage().instance().has(&DataKey::Config) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
