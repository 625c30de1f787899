use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::errors::LedgerError;
use crate::storage::*;

pub fn to_i128(env: &Env, amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic_with_error!(env, LedgerError::MathOverflow);
    }
    amount as i128
}

/// `a * b / denominator`, rounded down.
pub fn mul_div_floor(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic_with_error!(env, LedgerError::MathOverflow);
    }
    a.checked_mul(b)
        .unwrap_or_else(|| panic_with_error!(env, LedgerError::MathOverflow))
        / denominator
}

pub fn checked_add(env: &Env, a: u128, b: u128) -> u128 {
    a.checked_add(b)
        .unwrap_or_else(|| panic_with_error!(env, LedgerError::MathOverflow))
}

/// Tokens of `asset` the ledger actually holds.
pub fn custody_balance(env: &Env, asset: &Address) -> u128 {
    let bal = token::Client::new(env, asset).balance(&env.current_contract_address());
    if bal < 0 {
        panic_with_error!(env, LedgerError::MathOverflow);
    }
    bal as u128
}

pub fn transfer_in(env: &Env, asset: &Address, from: &Address, amount: u128) {
    token::Client::new(env, asset).transfer(
        from,
        &env.current_contract_address(),
        &to_i128(env, amount),
    );
}

pub fn transfer_out(env: &Env, asset: &Address, to: &Address, amount: u128) {
    token::Client::new(env, asset).transfer(
        &env.current_contract_address(),
        to,
        &to_i128(env, amount),
    );
}

pub fn require_owner(env: &Env, caller: &Address) {
    let owner = read_owner(env);
    if owner != *caller {
        panic_with_error!(env, LedgerError::Unauthorized);
    }
    caller.require_auth();
}

/// Only the engine named in the implementation pointer may drive loans.
pub fn require_engine(env: &Env) -> Implementation {
    let implementation = read_implementation(env)
        .unwrap_or_else(|| panic_with_error!(env, LedgerError::NotInitialized));
    implementation.engine.require_auth();
    implementation
}

pub fn require_no_loan(env: &Env, asset: &Address) {
    if has_active_loan(env, asset) {
        panic_with_error!(env, LedgerError::LoanInFlight);
    }
}
