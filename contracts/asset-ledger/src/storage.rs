use soroban_sdk::{contracttype, panic_with_error, Address, Env, Vec};

use crate::errors::LedgerError;

// Storage key types for the contract
#[contracttype]
pub enum DataKey {
    Owner,                    // Address
    PendingOwner,             // Address, set between propose and accept
    Implementation,           // Implementation
    LoansInFlight,            // u32, open loans across all assets
    LedgerAssets,             // Vec<Address>, every asset that has a ledger
    Allowed(Address),         // bool per asset
    Ledger(Address),          // LedgerRecord per asset
    Shares(Address, Address), // (asset, provider) -> u128
    ActiveLoan(Address),      // ActiveLoan per asset, temporary storage
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

/// Share accounting for one asset. `outstanding` is principal currently out
/// on loan and is zero whenever no loan is open.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerRecord {
    pub total_shares: u128,
    pub underlying_balance: u128,
    pub outstanding: u128,
}

impl LedgerRecord {
    pub fn empty() -> Self {
        LedgerRecord {
            total_shares: 0,
            underlying_balance: 0,
            outstanding: 0,
        }
    }

    /// Underlying held in custody right now (not out on loan).
    pub fn cash(&self) -> u128 {
        self.underlying_balance.saturating_sub(self.outstanding)
    }
}

/// Ledger side of an open flash loan. Lives only between `open_loan` and
/// `close_loan` of a single invocation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveLoan {
    pub receiver: Address,
    pub principal: u128,
    pub fee: u128,
    /// Incremented by `repay` and nothing else.
    pub repaid: u128,
    pub pre_loan_balance: u128,
}

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

/// Engine and fee oracle the ledger currently obeys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Implementation {
    pub engine: Address,
    pub fee_oracle: Address,
    pub version: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedeemAmount {
    All,
    Shares(u128),
}

pub fn bump_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn bump_asset_ttl(env: &Env, asset: &Address) {
    let persistent = env.storage().persistent();
    let ledger_key = DataKey::Ledger(asset.clone());
    if persistent.has(&ledger_key) {
        persistent.extend_ttl(&ledger_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    let allowed_key = DataKey::Allowed(asset.clone());
    if persistent.has(&allowed_key) {
        persistent.extend_ttl(&allowed_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_assets_list_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&DataKey::LedgerAssets) {
        persistent.extend_ttl(&DataKey::LedgerAssets, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_shares_ttl(env: &Env, asset: &Address, provider: &Address) {
    let persistent = env.storage().persistent();
    let key = DataKey::Shares(asset.clone(), provider.clone());
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn read_owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, LedgerError::NotInitialized))
}

pub fn write_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn read_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::PendingOwner)
}

pub fn write_pending_owner(env: &Env, pending: &Address) {
    env.storage().instance().set(&DataKey::PendingOwner, pending);
}

pub fn clear_pending_owner(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingOwner);
}

pub fn read_implementation(env: &Env) -> Option<Implementation> {
    env.storage().instance().get(&DataKey::Implementation)
}

pub fn write_implementation(env: &Env, implementation: &Implementation) {
    env.storage()
        .instance()
        .set(&DataKey::Implementation, implementation);
}

pub fn loans_in_flight(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::LoansInFlight)
        .unwrap_or(0u32)
}

pub fn write_loans_in_flight(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::LoansInFlight, &count);
}

pub fn is_allowed(env: &Env, asset: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Allowed(asset.clone()))
        .unwrap_or(false)
}

pub fn write_allowed(env: &Env, asset: &Address, allowed: bool) {
    env.storage()
        .persistent()
        .set(&DataKey::Allowed(asset.clone()), &allowed);
}

pub fn read_record(env: &Env, asset: &Address) -> Option<LedgerRecord> {
    bump_asset_ttl(env, asset);
    env.storage()
        .persistent()
        .get(&DataKey::Ledger(asset.clone()))
}

pub fn write_record(env: &Env, asset: &Address, record: &LedgerRecord) {
    env.storage()
        .persistent()
        .set(&DataKey::Ledger(asset.clone()), record);
    bump_asset_ttl(env, asset);
}

pub fn ledger_assets(env: &Env) -> Vec<Address> {
    bump_assets_list_ttl(env);
    env.storage()
        .persistent()
        .get(&DataKey::LedgerAssets)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn push_ledger_asset(env: &Env, asset: &Address) {
    let mut assets = ledger_assets(env);
    assets.push_back(asset.clone());
    env.storage()
        .persistent()
        .set(&DataKey::LedgerAssets, &assets);
    bump_assets_list_ttl(env);
}

pub fn read_shares(env: &Env, asset: &Address, provider: &Address) -> u128 {
    bump_shares_ttl(env, asset, provider);
    env.storage()
        .persistent()
        .get(&DataKey::Shares(asset.clone(), provider.clone()))
        .unwrap_or(0u128)
}

pub fn write_shares(env: &Env, asset: &Address, provider: &Address, shares: u128) {
    env.storage()
        .persistent()
        .set(&DataKey::Shares(asset.clone(), provider.clone()), &shares);
    bump_shares_ttl(env, asset, provider);
}

pub fn read_active_loan(env: &Env, asset: &Address) -> Option<ActiveLoan> {
    env.storage()
        .temporary()
        .get(&DataKey::ActiveLoan(asset.clone()))
}

pub fn has_active_loan(env: &Env, asset: &Address) -> bool {
    env.storage()
        .temporary()
        .has(&DataKey::ActiveLoan(asset.clone()))
}

pub fn write_active_loan(env: &Env, asset: &Address, loan: &ActiveLoan) {
    env.storage()
        .temporary()
        .set(&DataKey::ActiveLoan(asset.clone()), loan);
}

pub fn remove_active_loan(env: &Env, asset: &Address) {
    env.storage()
        .temporary()
        .remove(&DataKey::ActiveLoan(asset.clone()));
}
