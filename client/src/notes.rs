use std::sync::Arc;

use log::{debug, trace, warn};
use nota_common::{
    config::{BASE_FEE, DEFAULT_NOTE_FEE, DEFAULT_TX_TIMEOUT_SECS},
    crypto::Address,
    network::Network,
    note::Note,
    value::ScValue,
};

use crate::{
    builder,
    confirmation::{ConfirmationEngine, ConfirmationPolicy},
    decoder,
    error::ClientError,
    ledger_api::LedgerApi,
    wallet_bridge::{SignerBridge, WalletProvider},
};

/// The notes contract surface.
///
/// Every mutating operation goes through one parameterized flow
/// (build, prepare, sign, submit, confirm, decode) and returns its outcome
/// as a value; read-only operations take the simulate-only path and degrade
/// to neutral defaults so listing and viewing survive transient RPC hiccups.
pub struct NotesClient {
    api: Arc<dyn LedgerApi>,
    signer: SignerBridge,
    contract: Address,
    network: Network,
    policy: ConfirmationPolicy,
    fee_ceiling: u64,
    timeout_secs: u64,
}

impl NotesClient {
    pub fn new(
        api: Arc<dyn LedgerApi>,
        provider: Arc<dyn WalletProvider>,
        contract: Address,
        network: Network,
    ) -> Self {
        Self {
            api,
            signer: SignerBridge::new(provider),
            contract,
            network,
            policy: ConfirmationPolicy::default(),
            fee_ceiling: BASE_FEE,
            timeout_secs: DEFAULT_TX_TIMEOUT_SECS,
        }
    }

    pub fn with_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fee_ceiling(mut self, fee_ceiling: u64) -> Self {
        self.fee_ceiling = fee_ceiling;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn get_signer(&self) -> &SignerBridge {
        &self.signer
    }

    pub fn get_contract(&self) -> &Address {
        &self.contract
    }

    // Local, synchronous guard: a malformed identifier never costs a
    // network round trip
    fn parse_address(raw: &str) -> Result<Address, ClientError> {
        raw.parse::<Address>().map_err(|e| {
            ClientError::ValidationFailed(format!("invalid account identifier '{}': {}", raw, e))
        })
    }

    // The one mutating flow shared by every write operation
    async fn invoke(
        &self,
        source: &Address,
        function: &str,
        args: Vec<ScValue>,
    ) -> Result<Option<ScValue>, ClientError> {
        trace!("invoke {}", function);

        let envelope = builder::build_contract_call(
            self.api.as_ref(),
            source,
            &self.contract,
            function,
            args,
            self.network,
            self.fee_ceiling,
            self.timeout_secs,
        )
        .await?;

        // Prepare: let the ledger estimate resources before signing and
        // raise the fee when the estimate is above our ceiling
        let simulation = self.api.simulate_transaction(&envelope).await?;
        if let Some(error) = simulation.error {
            return Err(ClientError::LedgerRejected(error));
        }
        let envelope = match simulation.resource_fee {
            Some(resource_fee) if resource_fee > envelope.fee => {
                if log::log_enabled!(log::Level::Debug) {
                    debug!(
                        "Raising {} fee from {} to simulated {}",
                        function, envelope.fee, resource_fee
                    );
                }
                envelope.with_fee(resource_fee)
            }
            _ => envelope,
        };

        let signed = self.signer.sign(&envelope).await?;
        let engine = ConfirmationEngine::with_policy(self.api.as_ref(), self.policy.clone());
        let confirmed = engine.submit_and_confirm(&signed).await?;

        Ok(decoder::return_value(&confirmed).cloned())
    }

    // The read-only path: no signature, no submission, one simulation
    async fn query(&self, function: &str, args: Vec<ScValue>) -> Option<ScValue> {
        trace!("query {}", function);

        let envelope = builder::build_query_call(
            &self.contract,
            function,
            args,
            self.network,
            self.fee_ceiling,
            self.timeout_secs,
        );

        match self.api.simulate_transaction(&envelope).await {
            Ok(simulation) => decoder::simulation_value(&simulation).cloned(),
            Err(error) => {
                debug!("{} query failed: {}", function, error);
                None
            }
        }
    }

    /// One-time contract setup: developer wallet and per-note fee.
    pub async fn initialize(
        &self,
        source: &str,
        dev_wallet: &str,
        note_fee: i128,
    ) -> Result<(), ClientError> {
        let source = Self::parse_address(source)?;
        let dev_wallet = Self::parse_address(dev_wallet)?;

        self.invoke(
            &source,
            "initialize",
            vec![ScValue::address(dev_wallet), ScValue::i128(note_fee)],
        )
        .await?;
        Ok(())
    }

    /// Create a note and return the contract-assigned id.
    ///
    /// The id is decoded from the confirmed transaction's execution
    /// metadata; when the ledger omits the metadata entirely the neutral 0
    /// is returned (the contract never assigns id 0).
    pub async fn create_note(
        &self,
        owner: &str,
        title: &str,
        content_ref: &str,
    ) -> Result<u64, ClientError> {
        let owner = Self::parse_address(owner)?;

        let returned = self
            .invoke(
                &owner,
                "create_note",
                vec![
                    ScValue::address(owner.clone()),
                    ScValue::string(title),
                    ScValue::string(content_ref),
                ],
            )
            .await?;

        Ok(decoder::decode_u64(returned.as_ref()).unwrap_or(0))
    }

    /// Replace title and content pointer of an owned note.
    pub async fn update_note(
        &self,
        id: u64,
        owner: &str,
        title: &str,
        content_ref: &str,
    ) -> Result<bool, ClientError> {
        let owner = Self::parse_address(owner)?;

        let returned = self
            .invoke(
                &owner,
                "update_note",
                vec![
                    ScValue::u64(id),
                    ScValue::address(owner.clone()),
                    ScValue::string(title),
                    ScValue::string(content_ref),
                ],
            )
            .await?;

        Ok(decoder::decode_bool(returned.as_ref()).unwrap_or(false))
    }

    /// Soft-delete a note: the record stays on the ledger with its active
    /// flag cleared, and keeps counting towards the owner's totals.
    pub async fn delete_note(&self, id: u64, owner: &str) -> Result<bool, ClientError> {
        let owner = Self::parse_address(owner)?;

        let returned = self
            .invoke(
                &owner,
                "delete_note",
                vec![ScValue::u64(id), ScValue::address(owner.clone())],
            )
            .await?;

        Ok(decoder::decode_bool(returned.as_ref()).unwrap_or(false))
    }

    /// Update the per-note fee. Only the developer wallet may call this.
    pub async fn update_fee(&self, admin: &str, new_fee: i128) -> Result<(), ClientError> {
        let admin = Self::parse_address(admin)?;

        self.invoke(
            &admin,
            "update_fee",
            vec![ScValue::address(admin.clone()), ScValue::i128(new_fee)],
        )
        .await?;
        Ok(())
    }

    /// All active notes of an owner, in ledger order.
    pub async fn get_user_notes(&self, owner: &str) -> Vec<Note> {
        let owner = match owner.parse::<Address>() {
            Ok(owner) => owner,
            Err(error) => {
                warn!("get_user_notes called with invalid owner: {}", error);
                return Vec::new();
            }
        };

        match self
            .query("get_user_notes", vec![ScValue::address(owner)])
            .await
        {
            Some(value) => decoder::decode_notes(&value),
            None => Vec::new(),
        }
    }

    /// A single note by id, None when absent, inactive or not owned.
    pub async fn get_note(&self, id: u64, owner: &str) -> Option<Note> {
        let owner = owner.parse::<Address>().ok()?;

        let value = self
            .query(
                "get_note",
                vec![ScValue::u64(id), ScValue::address(owner)],
            )
            .await?;
        decoder::decode_note(&value)
    }

    /// (count, active_count) of an owner's notes.
    pub async fn get_user_stats(&self, owner: &str) -> (u64, u64) {
        let owner = match owner.parse::<Address>() {
            Ok(owner) => owner,
            Err(_) => return (0, 0),
        };

        match self
            .query("get_user_stats", vec![ScValue::address(owner)])
            .await
        {
            Some(value) => decoder::decode_stats(&value).unwrap_or((0, 0)),
            None => (0, 0),
        }
    }

    /// Fee charged per note, falling back to the configured default.
    pub async fn get_note_fee(&self) -> i128 {
        let value = self.query("get_note_fee", Vec::new()).await;
        decoder::decode_i128(value.as_ref()).unwrap_or(DEFAULT_NOTE_FEE)
    }

    /// Total notes ever created on this contract.
    pub async fn get_total_notes_count(&self) -> u64 {
        let value = self.query("get_total_notes_count", Vec::new()).await;
        decoder::decode_u64(value.as_ref()).unwrap_or(0)
    }

    /// The developer wallet configured at initialization.
    pub async fn get_dev_wallet(&self) -> Option<Address> {
        let value = self.query("get_dev_wallet", Vec::new()).await;
        decoder::decode_address(value.as_ref())
    }
}
