use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Bytes, BytesN, Env};

use crate::errors::EngineError;
use crate::events::*;
use crate::helpers::*;
use crate::storage::*;

/// Engine-side record of a loan. Lives only in the `flash_loan` frame.
struct Loan {
    asset: Address,
    receiver: Address,
    principal: u128,
    fee: u128,
    pre_loan_balance: u128,
}

#[contract]
pub struct FlashLoanEngine;

#[contractimpl]
impl FlashLoanEngine {
    pub fn __constructor(env: Env, owner: Address, ledger: Address) {
        write_owner(&env, &owner);
        write_ledger(&env, &ledger);
        bump_instance_ttl(&env);
    }

    /// Lend `amount` of `asset` to `receiver`, run its `execute_operation`
    /// callback and settle. Any failure reverts the whole invocation.
    pub fn flash_loan(
        env: Env,
        initiator: Address,
        receiver: Address,
        asset: Address,
        amount: u128,
        params: Bytes,
    ) -> FlashLoanReceipt {
        initiator.require_auth();
        bump_instance_ttl(&env);
        if amount == 0 {
            panic_with_error!(&env, EngineError::InvalidAmount);
        }
        let ledger = LedgerClient::new(&env, &read_ledger(&env));
        if !ledger.is_allowed(&asset) {
            panic_with_error!(&env, EngineError::NotAllowedToken);
        }
        if amount > ledger.available_liquidity(&asset) {
            panic_with_error!(&env, EngineError::InsufficientLiquidity);
        }
        // Retired engines keep their code but can no longer lend
        let implementation = ledger.implementation();
        if implementation.engine != env.current_contract_address() {
            panic_with_error!(&env, EngineError::Unauthorized);
        }

        let fee =
            FeeOracleClient::new(&env, &implementation.fee_oracle).calculate_fee(&asset, &amount);

        let pre_loan_balance = ledger.open_loan(&asset, &receiver, &amount, &fee);
        let loan = Loan {
            asset,
            receiver,
            principal: amount,
            fee,
            pre_loan_balance,
        };

        let callback = FlashLoanReceiverClient::new(&env, &loan.receiver).try_execute_operation(
            &loan.asset,
            &loan.principal,
            &loan.fee,
            &initiator,
            &params,
        );
        if !matches!(callback, Ok(Ok(true))) {
            panic_with_error!(&env, EngineError::CallbackFailed);
        }

        let settlement = ledger.close_loan(&loan.asset);
        if settlement.underlying_balance < required_balance(&env, loan.pre_loan_balance, loan.fee)
        {
            panic_with_error!(&env, EngineError::RepaymentShortfall);
        }

        FlashLoan {
            asset: loan.asset.clone(),
            receiver: loan.receiver.clone(),
            initiator,
            amount: loan.principal,
            fee: loan.fee,
            fee_income: settlement.fee_income,
        }
        .publish(&env);
        FlashLoanReceipt {
            asset: loan.asset,
            receiver: loan.receiver,
            amount: loan.principal,
            fee: loan.fee,
            fee_income: settlement.fee_income,
            underlying_balance: settlement.underlying_balance,
        }
    }

    /// Fee the current oracle would charge for a loan of `amount` right now.
    pub fn quote_fee(env: Env, asset: Address, amount: u128) -> u128 {
        let ledger = LedgerClient::new(&env, &read_ledger(&env));
        let implementation = ledger.implementation();
        FeeOracleClient::new(&env, &implementation.fee_oracle).calculate_fee(&asset, &amount)
    }

    pub fn ledger(env: Env) -> Address {
        read_ledger(&env)
    }

    pub fn owner(env: Env) -> Address {
        read_owner(&env)
    }

    pub fn set_owner(env: Env, caller: Address, new_owner: Address) {
        require_owner(&env, &caller);
        write_owner(&env, &new_owner);
        EngineOwnerChanged {
            previous_owner: caller,
            owner: new_owner,
        }
        .publish(&env);
    }

    /// Owner: replace this engine's code in place. Only configuration lives
    /// here, so ledger state is out of reach of a code swap.
    pub fn upgrade_wasm(env: Env, caller: Address, new_wasm_hash: BytesN<32>) {
        bump_instance_ttl(&env);
        require_owner(&env, &caller);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    pub fn bump_ttl(env: Env) {
        bump_instance_ttl(&env);
    }
}
