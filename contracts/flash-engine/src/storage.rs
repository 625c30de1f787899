use soroban_sdk::{contracttype, panic_with_error, Address, Bytes, Env};

use crate::errors::EngineError;

#[contracttype]
pub enum DataKey {
    Owner,  // Address
    Ledger, // Address of the asset ledger this engine lends from
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

/// Ledger's implementation pointer, as returned by `implementation()`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Implementation {
    pub engine: Address,
    pub fee_oracle: Address,
    pub version: u32,
}

/// Ledger's view of a settled loan, as returned by `close_loan()`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanSettlement {
    pub principal: u128,
    pub fee: u128,
    pub repaid: u128,
    pub fee_income: u128,
    pub pre_loan_balance: u128,
    pub underlying_balance: u128,
}

/// Returned to the initiator of a successful flash loan.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoanReceipt {
    pub asset: Address,
    pub receiver: Address,
    pub amount: u128,
    pub fee: u128,
    pub fee_income: u128,
    pub underlying_balance: u128,
}

#[soroban_sdk::contractclient(name = "LedgerClient")]
pub trait LedgerContract {
    fn is_allowed(env: Env, asset: Address) -> bool;
    fn available_liquidity(env: Env, asset: Address) -> u128;
    fn implementation(env: Env) -> Implementation;
    fn open_loan(env: Env, asset: Address, receiver: Address, amount: u128, fee: u128) -> u128;
    fn close_loan(env: Env, asset: Address) -> LoanSettlement;
}

#[soroban_sdk::contractclient(name = "FeeOracleClient")]
pub trait FeeOracleContract {
    fn calculate_fee(env: Env, asset: Address, amount: u128) -> u128;
}

/// Interface a borrower contract implements. It receives the loan before the
/// call and must `repay` principal plus fee on the ledger before returning
/// `true`.
#[soroban_sdk::contractclient(name = "FlashLoanReceiverClient")]
pub trait FlashLoanReceiver {
    fn execute_operation(
        env: Env,
        asset: Address,
        amount: u128,
        fee: u128,
        initiator: Address,
        params: Bytes,
    ) -> bool;
}

pub fn bump_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn read_owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, EngineError::NotInitialized))
}

pub fn write_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn read_ledger(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .unwrap_or_else(|| panic_with_error!(env, EngineError::NotInitialized))
}

pub fn write_ledger(env: &Env, ledger: &Address) {
    env.storage().instance().set(&DataKey::Ledger, ledger);
}
