use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, Vec};

use crate::constants::*;
use crate::errors::LedgerError;
use crate::events::*;
use crate::helpers::*;
use crate::storage::*;

#[contract]
pub struct AssetLedger;

#[contractimpl]
impl AssetLedger {
    /// Deploy with the owner that administers the registry and the upgrade gate.
    /// Loans stay disabled until the first `upgrade` names an engine.
    pub fn __constructor(env: Env, owner: Address) {
        write_owner(&env, &owner);
        write_loans_in_flight(&env, 0);
        bump_instance_ttl(&env);
    }

    // ---------------------------------------------------------------------
    // Token registry
    // ---------------------------------------------------------------------

    /// Owner: add or remove `asset` from the allowed set. The first allow
    /// creates the asset's ledger record; removing keeps it.
    pub fn set_allowed(env: Env, caller: Address, asset: Address, allowed: bool) -> LedgerRecord {
        require_owner(&env, &caller);
        bump_instance_ttl(&env);
        require_no_loan(&env, &asset);

        let (record, created) = match read_record(&env, &asset) {
            Some(record) => (record, false),
            None => {
                if !allowed {
                    panic_with_error!(&env, LedgerError::NotFound);
                }
                let record = LedgerRecord::empty();
                write_record(&env, &asset, &record);
                push_ledger_asset(&env, &asset);
                (record, true)
            }
        };

        if created || is_allowed(&env, &asset) != allowed {
            write_allowed(&env, &asset, allowed);
            AssetAllowed {
                asset: asset.clone(),
                allowed,
                created,
            }
            .publish(&env);
        }
        record
    }

    pub fn is_allowed(env: Env, asset: Address) -> bool {
        is_allowed(&env, &asset)
    }

    pub fn ledger_of(env: Env, asset: Address) -> LedgerRecord {
        read_record(&env, &asset).unwrap_or_else(|| panic_with_error!(&env, LedgerError::NotFound))
    }

    /// Every asset that has a ledger record, in the order they were first allowed.
    pub fn ledger_assets(env: Env) -> Vec<Address> {
        ledger_assets(&env)
    }

    // ---------------------------------------------------------------------
    // Share ledger
    // ---------------------------------------------------------------------

    /// Deposit `amount` of `asset` and receive claim-shares at the current rate
    pub fn deposit(env: Env, provider: Address, asset: Address, amount: u128) -> u128 {
        provider.require_auth();
        bump_instance_ttl(&env);
        if amount == 0 {
            panic_with_error!(&env, LedgerError::InvalidAmount);
        }
        let mut record = allowed_record(&env, &asset);

        // Minted at the pre-deposit rate so existing holders are not diluted
        let shares = shares_for_deposit(&env, &record, amount);
        if shares == 0 {
            panic_with_error!(&env, LedgerError::InvalidAmount);
        }

        transfer_in(&env, &asset, &provider, amount);

        record.underlying_balance = checked_add(&env, record.underlying_balance, amount);
        record.total_shares = checked_add(&env, record.total_shares, shares);
        write_record(&env, &asset, &record);
        let held = read_shares(&env, &asset, &provider);
        write_shares(&env, &asset, &provider, checked_add(&env, held, shares));

        Deposit {
            provider,
            asset,
            amount,
            shares,
        }
        .publish(&env);
        shares
    }

    /// Burn claim-shares and withdraw their underlying value.
    pub fn redeem(env: Env, provider: Address, asset: Address, amount: RedeemAmount) -> u128 {
        provider.require_auth();
        bump_instance_ttl(&env);
        let mut record = allowed_record(&env, &asset);
        require_no_loan(&env, &asset);

        let held = read_shares(&env, &asset, &provider);
        let shares = match amount {
            RedeemAmount::All => {
                if held == 0 {
                    panic_with_error!(&env, LedgerError::InsufficientShares);
                }
                held
            }
            RedeemAmount::Shares(n) => {
                if n == 0 {
                    panic_with_error!(&env, LedgerError::InvalidAmount);
                }
                if n > held {
                    panic_with_error!(&env, LedgerError::InsufficientShares);
                }
                n
            }
        };

        let payout = value_of_shares(&env, &record, shares);
        if payout == 0 {
            panic_with_error!(&env, LedgerError::InvalidAmount);
        }
        if payout > record.cash() {
            panic_with_error!(&env, LedgerError::InsufficientLiquidity);
        }

        record.underlying_balance -= payout;
        record.total_shares -= shares;
        write_record(&env, &asset, &record);
        write_shares(&env, &asset, &provider, held - shares);

        transfer_out(&env, &asset, &provider, payout);

        Redeem {
            provider,
            asset,
            amount: payout,
            shares,
        }
        .publish(&env);
        payout
    }

    pub fn shares_of(env: Env, asset: Address, provider: Address) -> u128 {
        read_shares(&env, &asset, &provider)
    }

    /// Underlying per share, scaled 1e18.
    pub fn exchange_rate(env: Env, asset: Address) -> u128 {
        let record = Self::ledger_of(env.clone(), asset);
        if record.total_shares == 0 {
            return INITIAL_EXCHANGE_RATE;
        }
        mul_div_floor(&env, record.underlying_balance, RATE_SCALE, record.total_shares)
    }

    pub fn available_liquidity(env: Env, asset: Address) -> u128 {
        read_record(&env, &asset).map(|r| r.cash()).unwrap_or(0)
    }

    pub fn preview_deposit(env: Env, asset: Address, amount: u128) -> u128 {
        let record = Self::ledger_of(env.clone(), asset);
        shares_for_deposit(&env, &record, amount)
    }

    pub fn preview_redeem(env: Env, asset: Address, shares: u128) -> u128 {
        let record = Self::ledger_of(env.clone(), asset);
        value_of_shares(&env, &record, shares)
    }

    /// Underlying `provider` would receive for all of their shares right now.
    pub fn underlying_value(env: Env, asset: Address, provider: Address) -> u128 {
        let record = Self::ledger_of(env.clone(), asset.clone());
        let held = read_shares(&env, &asset, &provider);
        value_of_shares(&env, &record, held)
    }

    // ---------------------------------------------------------------------
    // Loan bookkeeping, driven by the current engine
    // ---------------------------------------------------------------------

    /// Engine: lend `amount` to `receiver` and record what must come back.
    /// Returns the pre-loan underlying balance.
    pub fn open_loan(env: Env, asset: Address, receiver: Address, amount: u128, fee: u128) -> u128 {
        require_engine(&env);
        bump_instance_ttl(&env);
        if amount == 0 {
            panic_with_error!(&env, LedgerError::InvalidAmount);
        }
        let mut record = allowed_record(&env, &asset);
        require_no_loan(&env, &asset);
        if amount > record.cash() {
            panic_with_error!(&env, LedgerError::InsufficientLiquidity);
        }

        let pre_loan_balance = record.underlying_balance;
        record.outstanding = checked_add(&env, record.outstanding, amount);
        write_record(&env, &asset, &record);
        write_active_loan(
            &env,
            &asset,
            &ActiveLoan {
                receiver: receiver.clone(),
                principal: amount,
                fee,
                repaid: 0,
                pre_loan_balance,
            },
        );
        write_loans_in_flight(&env, loans_in_flight(&env) + 1);

        transfer_out(&env, &asset, &receiver, amount);

        LoanOpened {
            asset,
            receiver,
            principal: amount,
            fee,
        }
        .publish(&env);
        pre_loan_balance
    }

    /// Pay back an open loan on `asset`. The only path that counts as repayment,
    /// and it accepts no more than what is still owed.
    pub fn repay(env: Env, payer: Address, asset: Address, amount: u128) -> u128 {
        payer.require_auth();
        if amount == 0 {
            panic_with_error!(&env, LedgerError::InvalidAmount);
        }
        let mut loan = read_active_loan(&env, &asset)
            .unwrap_or_else(|| panic_with_error!(&env, LedgerError::NoLoanInFlight));
        let owed = checked_add(&env, loan.principal, loan.fee);
        if amount > owed - loan.repaid {
            panic_with_error!(&env, LedgerError::Overpayment);
        }

        transfer_in(&env, &asset, &payer, amount);
        loan.repaid = checked_add(&env, loan.repaid, amount);
        write_active_loan(&env, &asset, &loan);

        LoanRepaid {
            asset,
            payer,
            amount,
            repaid_total: loan.repaid,
        }
        .publish(&env);
        loan.repaid
    }

    /// Engine: settle the open loan on `asset`, folding the fee into the
    /// backing balance.
    pub fn close_loan(env: Env, asset: Address) -> LoanSettlement {
        require_engine(&env);
        bump_instance_ttl(&env);
        let loan = read_active_loan(&env, &asset)
            .unwrap_or_else(|| panic_with_error!(&env, LedgerError::NoLoanInFlight));
        let owed = checked_add(&env, loan.principal, loan.fee);
        if loan.repaid < owed {
            panic_with_error!(&env, LedgerError::RepaymentShortfall);
        }

        let mut record = read_record(&env, &asset)
            .unwrap_or_else(|| panic_with_error!(&env, LedgerError::NotFound));
        record.outstanding -= loan.principal;
        let fee_income = loan.fee;
        credit_fee(&env, &mut record, fee_income);

        if custody_balance(&env, &asset) < record.cash() {
            panic_with_error!(&env, LedgerError::RepaymentShortfall);
        }
        write_record(&env, &asset, &record);
        remove_active_loan(&env, &asset);
        write_loans_in_flight(&env, loans_in_flight(&env).saturating_sub(1));

        LoanSettled {
            asset,
            receiver: loan.receiver,
            principal: loan.principal,
            fee_income,
            underlying_balance: record.underlying_balance,
        }
        .publish(&env);
        LoanSettlement {
            principal: loan.principal,
            fee: loan.fee,
            repaid: loan.repaid,
            fee_income,
            pre_loan_balance: loan.pre_loan_balance,
            underlying_balance: record.underlying_balance,
        }
    }

    pub fn active_loan(env: Env, asset: Address) -> Option<ActiveLoan> {
        read_active_loan(&env, &asset)
    }

    // ---------------------------------------------------------------------
    // Upgrade gate
    // ---------------------------------------------------------------------

    /// Owner: point the ledger at a new engine and fee oracle. Ledger records,
    /// shares and the allowed set are untouched.
    pub fn upgrade(env: Env, caller: Address, engine: Address, fee_oracle: Address) -> u32 {
        require_owner(&env, &caller);
        if loans_in_flight(&env) > 0 {
            panic_with_error!(&env, LedgerError::LoanInFlight);
        }
        let version = read_implementation(&env).map(|i| i.version).unwrap_or(0) + 1;
        write_implementation(
            &env,
            &Implementation {
                engine: engine.clone(),
                fee_oracle: fee_oracle.clone(),
                version,
            },
        );
        bump_instance_ttl(&env);
        Upgraded {
            engine,
            fee_oracle,
            version,
        }
        .publish(&env);
        version
    }

    pub fn implementation(env: Env) -> Implementation {
        read_implementation(&env)
            .unwrap_or_else(|| panic_with_error!(&env, LedgerError::NotInitialized))
    }

    /// Owner: nominate a successor. Takes effect once they call `accept_owner`.
    pub fn propose_owner(env: Env, caller: Address, new_owner: Address) {
        require_owner(&env, &caller);
        write_pending_owner(&env, &new_owner);
        OwnershipProposed {
            owner: caller,
            pending_owner: new_owner,
        }
        .publish(&env);
    }

    pub fn accept_owner(env: Env, new_owner: Address) {
        let pending = read_pending_owner(&env)
            .unwrap_or_else(|| panic_with_error!(&env, LedgerError::NoPendingOwner));
        if pending != new_owner {
            panic_with_error!(&env, LedgerError::NoPendingOwner);
        }
        new_owner.require_auth();
        let previous_owner = read_owner(&env);
        write_owner(&env, &new_owner);
        clear_pending_owner(&env);
        bump_instance_ttl(&env);
        OwnershipTransferred {
            previous_owner,
            owner: new_owner,
        }
        .publish(&env);
    }

    pub fn owner(env: Env) -> Address {
        read_owner(&env)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        read_pending_owner(&env)
    }

    pub fn bump_ttl(env: Env) {
        bump_instance_ttl(&env);
        for asset in ledger_assets(&env).iter() {
            bump_asset_ttl(&env, &asset);
        }
    }
}

fn allowed_record(env: &Env, asset: &Address) -> LedgerRecord {
    if !is_allowed(env, asset) {
        panic_with_error!(env, LedgerError::NotAllowedToken);
    }
    read_record(env, asset).unwrap_or_else(|| panic_with_error!(env, LedgerError::NotFound))
}

fn shares_for_deposit(env: &Env, record: &LedgerRecord, amount: u128) -> u128 {
    if record.total_shares == 0 || record.underlying_balance == 0 {
        // Redeeming the last share pays out the whole balance, so an empty
        // ledger has nothing left for the next depositor to claim.
        if amount < MINIMUM_FIRST_DEPOSIT {
            return 0;
        }
        return amount;
    }
    mul_div_floor(env, amount, record.total_shares, record.underlying_balance)
}

fn value_of_shares(env: &Env, record: &LedgerRecord, shares: u128) -> u128 {
    if record.total_shares == 0 {
        return 0;
    }
    mul_div_floor(env, shares, record.underlying_balance, record.total_shares)
}

/// Grow the backing balance without minting shares.
fn credit_fee(env: &Env, record: &mut LedgerRecord, amount: u128) {
    record.underlying_balance = checked_add(env, record.underlying_balance, amount);
}
