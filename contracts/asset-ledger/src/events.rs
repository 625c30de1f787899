use soroban_sdk::{contractevent, Address};

/// Emitted when the owner adds or removes an asset from the allowed set.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetAllowed {
    #[topic]
    pub asset: Address,
    pub allowed: bool,
    pub created: bool,
}

/// Emitted on deposit when claim-shares are minted.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    #[topic]
    pub provider: Address,
    #[topic]
    pub asset: Address,
    pub amount: u128,
    pub shares: u128,
}

/// Emitted on redeem when claim-shares are burned.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redeem {
    #[topic]
    pub provider: Address,
    #[topic]
    pub asset: Address,
    pub amount: u128,
    pub shares: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanOpened {
    #[topic]
    pub asset: Address,
    #[topic]
    pub receiver: Address,
    pub principal: u128,
    pub fee: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRepaid {
    #[topic]
    pub asset: Address,
    #[topic]
    pub payer: Address,
    pub amount: u128,
    pub repaid_total: u128,
}

/// Loan closed; `fee_income` went to the backing balance of every holder.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanSettled {
    #[topic]
    pub asset: Address,
    #[topic]
    pub receiver: Address,
    pub principal: u128,
    pub fee_income: u128,
    pub underlying_balance: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Upgraded {
    #[topic]
    pub engine: Address,
    #[topic]
    pub fee_oracle: Address,
    pub version: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipProposed {
    #[topic]
    pub owner: Address,
    #[topic]
    pub pending_owner: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    #[topic]
    pub previous_owner: Address,
    #[topic]
    pub owner: Address,
}
