use soroban_sdk::{panic_with_error, Address, Env};

use crate::errors::EngineError;
use crate::storage::read_owner;

pub fn require_owner(env: &Env, caller: &Address) {
    if read_owner(env) != *caller {
        panic_with_error!(env, EngineError::Unauthorized);
    }
    caller.require_auth();
}

/// Backing balance the ledger must reach when a loan settles.
pub fn required_balance(env: &Env, pre_loan_balance: u128, fee: u128) -> u128 {
    pre_loan_balance
        .checked_add(fee)
        .unwrap_or_else(|| panic_with_error!(env, EngineError::MathOverflow))
}
