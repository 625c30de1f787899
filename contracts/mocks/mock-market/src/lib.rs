#![no_std]
use soroban_sdk::{contract, contractevent, contractimpl, contracttype, token, Address, Env};

#[contracttype]
enum DataKey {
    TokenA,
    TokenB,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Swap {
    #[topic]
    pub trader: Address,
    #[topic]
    pub asset_in: Address,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Two-asset constant-product market (x * y = k, no swap fee). Reserves are the
/// contract's own token balances, so any trade moves the quoted price.
#[contract]
pub struct MockMarket;

#[contractimpl]
impl MockMarket {
    pub fn __constructor(env: Env, token_a: Address, token_b: Address) {
        if token_a == token_b {
            panic!("identical assets");
        }
        env.storage().instance().set(&DataKey::TokenA, &token_a);
        env.storage().instance().set(&DataKey::TokenB, &token_b);
    }

    pub fn add_liquidity(env: Env, provider: Address, amount_a: u128, amount_b: u128) {
        provider.require_auth();
        if amount_a == 0 || amount_b == 0 {
            panic!("bad amount");
        }
        let (token_a, token_b) = get_pair(&env);
        let market = env.current_contract_address();
        token::Client::new(&env, &token_a).transfer(&provider, &market, &to_i128(amount_a));
        token::Client::new(&env, &token_b).transfer(&provider, &market, &to_i128(amount_b));
    }

    pub fn reserves(env: Env) -> (u128, u128) {
        let (token_a, token_b) = get_pair(&env);
        (reserve_of(&env, &token_a), reserve_of(&env, &token_b))
    }

    /// Amount of `asset_out` a trade of `amount_in` would receive right now.
    pub fn quote(env: Env, asset_in: Address, asset_out: Address, amount_in: u128) -> u128 {
        ensure_pair(&env, &asset_in, &asset_out);
        let reserve_in = reserve_of(&env, &asset_in);
        let reserve_out = reserve_of(&env, &asset_out);
        amount_out(reserve_in, reserve_out, amount_in)
    }

    pub fn swap(
        env: Env,
        trader: Address,
        asset_in: Address,
        amount_in: u128,
        min_out: u128,
    ) -> u128 {
        trader.require_auth();
        if amount_in == 0 {
            panic!("bad amount");
        }
        let (token_a, token_b) = get_pair(&env);
        let asset_out = if asset_in == token_a {
            token_b
        } else if asset_in == token_b {
            token_a
        } else {
            panic!("unknown asset");
        };
        let out = Self::quote(env.clone(), asset_in.clone(), asset_out.clone(), amount_in);
        if out == 0 || out < min_out {
            panic!("slippage");
        }
        let market = env.current_contract_address();
        token::Client::new(&env, &asset_in).transfer(&trader, &market, &to_i128(amount_in));
        token::Client::new(&env, &asset_out).transfer(&market, &trader, &to_i128(out));
        Swap {
            trader,
            asset_in,
            amount_in,
            amount_out: out,
        }
        .publish(&env);
        out
    }
}

fn amount_out(reserve_in: u128, reserve_out: u128, amount_in: u128) -> u128 {
    if reserve_in == 0 || reserve_out == 0 {
        return 0;
    }
    let numerator = reserve_out
        .checked_mul(amount_in)
        .expect("quote overflow");
    numerator / reserve_in.saturating_add(amount_in)
}

fn get_pair(env: &Env) -> (Address, Address) {
    let token_a: Address = env
        .storage()
        .instance()
        .get(&DataKey::TokenA)
        .expect("market not initialized");
    let token_b: Address = env
        .storage()
        .instance()
        .get(&DataKey::TokenB)
        .expect("market not initialized");
    (token_a, token_b)
}

fn ensure_pair(env: &Env, asset_in: &Address, asset_out: &Address) {
    let (token_a, token_b) = get_pair(env);
    let forward = *asset_in == token_a && *asset_out == token_b;
    let backward = *asset_in == token_b && *asset_out == token_a;
    if !forward && !backward {
        panic!("unknown pair");
    }
}

fn reserve_of(env: &Env, asset: &Address) -> u128 {
    let bal = token::Client::new(env, asset).balance(&env.current_contract_address());
    if bal < 0 {
        panic!("negative reserve");
    }
    bal as u128
}

fn to_i128(amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic!("amount exceeds i128");
    }
    amount as i128
}
