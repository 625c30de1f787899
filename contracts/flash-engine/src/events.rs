use soroban_sdk::{contractevent, Address};

/// Emitted once a flash loan has been repaid and settled.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoan {
    #[topic]
    pub asset: Address,
    #[topic]
    pub receiver: Address,
    pub initiator: Address,
    pub amount: u128,
    pub fee: u128,
    pub fee_income: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineOwnerChanged {
    #[topic]
    pub previous_owner: Address,
    #[topic]
    pub owner: Address,
}
