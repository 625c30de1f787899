#![no_std]

mod contract;
mod errors;
mod events;
mod helpers;
mod storage;

pub use contract::{FlashLoanEngine, FlashLoanEngineClient};
pub use errors::EngineError;
pub use events::*;
pub use storage::{
    FeeOracleClient, FlashLoanReceipt, FlashLoanReceiver, FlashLoanReceiverClient, Implementation,
    LedgerClient, LoanSettlement,
};
