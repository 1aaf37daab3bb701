use log::debug;
use nota_common::{
    api::GetAccountResult,
    crypto::Address,
    network::Network,
    time::get_current_time_in_seconds,
    transaction::{ContractInvocation, TransactionEnvelope},
    value::ScValue,
};

use crate::{error::ClientError, ledger_api::LedgerApi};

// Assemble an unsigned envelope from an account snapshot. Pure, no I/O.
// The expiry horizon makes a stale envelope provably rejectable, bounding
// how long a half-submitted operation can stay ambiguous.
pub fn assemble(
    account: &GetAccountResult,
    contract: &Address,
    function: &str,
    args: Vec<ScValue>,
    network: Network,
    fee: u64,
    timeout_secs: u64,
) -> TransactionEnvelope {
    TransactionEnvelope {
        source: account.id.clone(),
        sequence: account.sequence + 1,
        invocation: ContractInvocation {
            contract: contract.clone(),
            function: function.to_owned(),
            args,
        },
        fee,
        network,
        valid_until: get_current_time_in_seconds() + timeout_secs,
    }
}

// Build an envelope for a mutating call.
// The account-sequence lookup is the only I/O the builder performs.
#[allow(clippy::too_many_arguments)]
pub async fn build_contract_call(
    api: &dyn LedgerApi,
    source: &Address,
    contract: &Address,
    function: &str,
    args: Vec<ScValue>,
    network: Network,
    fee: u64,
    timeout_secs: u64,
) -> Result<TransactionEnvelope, ClientError> {
    let account = api.get_account(source).await?;
    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Building {} call with sequence {}",
            function,
            account.sequence + 1
        );
    }

    Ok(assemble(
        &account,
        contract,
        function,
        args,
        network,
        fee,
        timeout_secs,
    ))
}

// Build an envelope for a read-only call.
// Simulation does not check sequence numbers, so the contract itself serves
// as the source and no account is fetched.
pub fn build_query_call(
    contract: &Address,
    function: &str,
    args: Vec<ScValue>,
    network: Network,
    fee: u64,
    timeout_secs: u64,
) -> TransactionEnvelope {
    let snapshot = GetAccountResult {
        id: contract.clone(),
        sequence: 0,
    };
    assemble(
        &snapshot,
        contract,
        function,
        args,
        network,
        fee,
        timeout_secs,
    )
}
