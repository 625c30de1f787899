#![no_std]

mod constants;
mod contract;
mod errors;
mod events;
mod helpers;
mod storage;

pub use constants::*;
pub use contract::{AssetLedger, AssetLedgerClient};
pub use errors::LedgerError;
pub use events::*;
pub use storage::{ActiveLoan, Implementation, LedgerRecord, LoanSettlement, RedeemAmount};
