use soroban_sdk::contracterror;

/// Same numbering as the asset ledger's errors.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EngineError {
    Unauthorized = 1,
    NotAllowedToken = 2,
    InsufficientShares = 3,
    InsufficientLiquidity = 4,
    RepaymentShortfall = 5,
    InvalidAmount = 6,
    LoanInFlight = 7,
    NoLoanInFlight = 8,
    NotFound = 9,
    NotInitialized = 10,
    CallbackFailed = 11,
    MathOverflow = 12,
    NoPendingOwner = 13,
    Overpayment = 14,
}
