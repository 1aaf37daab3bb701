// End to end flows against deterministic ledger and wallet fakes.
//
// The fakes count every call on the RPC boundary so the tests can assert
// not only outcomes but also that no network round trip happens where an
// operation promises local-only validation.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use nota_client::{
    confirmation::ConfirmationPolicy,
    error::ClientError,
    ledger_api::LedgerApi,
    notes::NotesClient,
    wallet_bridge::{ProviderError, WalletProvider},
};
use nota_common::{
    api::{
        GetAccountResult, GetTransactionResult, SendStatus, SendTransactionResult, SorobanMeta,
        SimulateTransactionResult, TransactionMeta, TransactionStatus,
    },
    config::DEFAULT_NOTE_FEE,
    crypto::{Address, TxHash},
    network::Network,
    rpc::{JsonRPCError, JsonRPCResult},
    transaction::{SignedEnvelope, TransactionEnvelope},
    value::{ScMapEntry, ScValue},
};

const OWNER: &str = "GDWREJ5HETNIDTQKXJZPA6LRSJMFUCO4T2DFEJYSZ2XVWRTMUG64AL4B";
const CONTRACT: &str = "CCFNZO33IO6GDTPLWWRJ5F34UBXEBOSYGSQJJGVLAJNNULU26CRZR6TM";
const HASH: &str = "e18456c437deb4d21dceee8db938ac8bcea25405af8df02d9225104e5d53e185";

#[derive(Default)]
struct MockLedger {
    get_account_calls: AtomicUsize,
    simulate_calls: AtomicUsize,
    send_calls: AtomicUsize,
    get_transaction_calls: AtomicUsize,
    sequence: u64,
    // answer for sendTransaction; default is PENDING with HASH
    send_response: Mutex<Option<SendTransactionResult>>,
    // scripted getTransaction answers, NOT_FOUND once exhausted
    poll_script: Mutex<VecDeque<GetTransactionResult>>,
    // per-function simulation results; missing entries simulate cleanly
    simulate_results: Mutex<HashMap<String, SimulateTransactionResult>>,
    // when set, every simulation fails at the transport level
    fail_simulation: bool,
}

impl MockLedger {
    fn with_sequence(sequence: u64) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    fn script_polls(&self, responses: Vec<GetTransactionResult>) {
        *self.poll_script.lock().unwrap() = responses.into();
    }

    fn script_simulation(&self, function: &str, result: SimulateTransactionResult) {
        self.simulate_results
            .lock()
            .unwrap()
            .insert(function.to_owned(), result);
    }

    fn script_send(&self, response: SendTransactionResult) {
        *self.send_response.lock().unwrap() = Some(response);
    }
}

#[async_trait]
impl LedgerApi for MockLedger {
    async fn get_account(&self, address: &Address) -> JsonRPCResult<GetAccountResult> {
        self.get_account_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GetAccountResult {
            id: address.clone(),
            sequence: self.sequence,
        })
    }

    async fn simulate_transaction(
        &self,
        transaction: &TransactionEnvelope,
    ) -> JsonRPCResult<SimulateTransactionResult> {
        self.simulate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_simulation {
            return Err(JsonRPCError::HttpStatus(503));
        }

        let results = self.simulate_results.lock().unwrap();
        Ok(results
            .get(&transaction.invocation.function)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_transaction(
        &self,
        _transaction: &SignedEnvelope,
    ) -> JsonRPCResult<SendTransactionResult> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .send_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(SendTransactionResult {
                hash: TxHash::from(HASH),
                status: SendStatus::Pending,
                error_message: None,
            }))
    }

    async fn get_transaction(&self, _hash: &TxHash) -> JsonRPCResult<GetTransactionResult> {
        self.get_transaction_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .poll_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(GetTransactionResult::not_found))
    }
}

enum WalletMode {
    Approve,
    Fail(&'static str),
}

struct MockWallet {
    mode: WalletMode,
    sign_calls: AtomicUsize,
    last_envelope: Mutex<Option<String>>,
}

impl MockWallet {
    fn approving() -> Self {
        Self::with_mode(WalletMode::Approve)
    }

    fn with_mode(mode: WalletMode) -> Self {
        Self {
            mode,
            sign_calls: AtomicUsize::new(0),
            last_envelope: Mutex::new(None),
        }
    }

    fn last_signed_envelope(&self) -> Option<TransactionEnvelope> {
        let wire = self.last_envelope.lock().unwrap().clone()?;
        TransactionEnvelope::from_wire(&wire).ok()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn is_connected(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }

    async fn request_access(&self) -> Result<String, ProviderError> {
        Ok("granted".to_owned())
    }

    async fn get_address(&self) -> Result<String, ProviderError> {
        Ok(OWNER.to_owned())
    }

    async fn sign_transaction(
        &self,
        envelope_wire: &str,
        _network: &Network,
        _account: &Address,
    ) -> Result<String, ProviderError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_envelope.lock().unwrap() = Some(envelope_wire.to_owned());
        match &self.mode {
            WalletMode::Approve => Ok(format!("signed:{}", envelope_wire)),
            WalletMode::Fail(message) => Err(ProviderError::new(*message)),
        }
    }
}

fn make_client(ledger: Arc<MockLedger>, wallet: Arc<MockWallet>) -> NotesClient {
    NotesClient::new(
        ledger,
        wallet,
        CONTRACT.parse().unwrap(),
        Network::Testnet,
    )
    .with_policy(ConfirmationPolicy {
        poll_interval: Duration::ZERO,
        max_attempts: 10,
    })
}

fn entry(key: &str, val: ScValue) -> ScMapEntry {
    ScMapEntry {
        key: ScValue::symbol(key),
        val,
    }
}

fn note_value(id: u64, title: &str, content_ref: &str, active: bool) -> ScValue {
    ScValue::Map(vec![
        entry("id", ScValue::u64(id)),
        entry("owner", ScValue::address(OWNER.parse().unwrap())),
        entry("title", ScValue::string(title)),
        entry("content_ref", ScValue::string(content_ref)),
        entry("created_at", ScValue::u64(1_752_673_305)),
        entry("active", ScValue::Bool(active)),
    ])
}

fn confirmed_with(value: ScValue) -> GetTransactionResult {
    GetTransactionResult {
        status: TransactionStatus::Success,
        result_code: Some("txSUCCESS".to_owned()),
        fee_charged: Some(100),
        result_meta: Some(TransactionMeta {
            soroban_meta: Some(SorobanMeta {
                return_value: Some(value),
            }),
        }),
        ledger: Some(480_745),
    }
}

fn confirmed_failure() -> GetTransactionResult {
    GetTransactionResult {
        status: TransactionStatus::Failed,
        result_code: Some("txFAILED".to_owned()),
        fee_charged: Some(100),
        result_meta: None,
        ledger: Some(480_746),
    }
}

fn simulation_returning(value: ScValue) -> SimulateTransactionResult {
    SimulateTransactionResult {
        return_value: Some(value),
        resource_fee: None,
        error: None,
    }
}

#[tokio::test]
async fn test_create_note_confirms_on_third_poll() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_polls(vec![
        GetTransactionResult::not_found(),
        GetTransactionResult::not_found(),
        confirmed_with(ScValue::u64(7)),
    ]);
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet.clone());

    let id = client.create_note(OWNER, "T1", "Qm123").await.unwrap();
    assert_eq!(id, 7);

    assert_eq!(ledger.get_account_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.get_transaction_calls.load(Ordering::SeqCst), 3);
    assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 1);

    // the signed envelope consumed the next sequence number
    let envelope = wallet.last_signed_envelope().unwrap();
    assert_eq!(envelope.sequence, 42);
    assert_eq!(envelope.invocation.function, "create_note");
}

#[tokio::test]
async fn test_created_note_shows_up_in_listing() -> anyhow::Result<()> {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_polls(vec![confirmed_with(ScValue::u64(7))]);
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let id = client.create_note(OWNER, "T1", "Qm123").await?;
    assert_eq!(id, 7);

    ledger.script_simulation(
        "get_user_notes",
        simulation_returning(ScValue::Vec(vec![note_value(7, "T1", "Qm123", true)])),
    );

    let notes = client.get_user_notes(OWNER).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, 7);
    assert_eq!(notes[0].title, "T1");
    assert_eq!(notes[0].content_ref, "Qm123");
    assert!(notes[0].active);
    Ok(())
}

#[tokio::test]
async fn test_user_rejection_blocks_submission() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    let wallet = Arc::new(MockWallet::with_mode(WalletMode::Fail(
        "The user rejected this request",
    )));
    let client = make_client(ledger.clone(), wallet.clone());

    let outcome = client.create_note(OWNER, "T1", "Qm123").await;
    assert!(matches!(outcome, Err(ClientError::UserRejected)));

    // refusal happens after signing was attempted, but nothing was sent
    assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.get_transaction_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_signer_is_network_failure() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    let wallet = Arc::new(MockWallet::with_mode(WalletMode::Fail(
        "Freighter is not installed",
    )));
    let client = make_client(ledger.clone(), wallet);

    let outcome = client.create_note(OWNER, "T1", "Qm123").await;
    assert!(matches!(outcome, Err(ClientError::NetworkFailed(_))));
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_owner_rejected_before_any_network_call() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet.clone());

    let outcome = client.create_note("not-an-address", "T1", "Qm123").await;
    assert!(matches!(outcome, Err(ClientError::ValidationFailed(_))));

    assert_eq!(ledger.get_account_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.simulate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 0);
    assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_polling_budget_exhaustion_is_timeout() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    // never a terminal status
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let outcome = client.delete_note(7, OWNER).await;
    match outcome {
        Err(ClientError::Timeout(hash)) => assert_eq!(hash.as_str(), HASH),
        other => panic!("expected Timeout, got {:?}", other),
    }

    // exactly the attempt budget, then it stopped
    assert_eq!(ledger.get_transaction_calls.load(Ordering::SeqCst), 10);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_confirmed_failure_is_terminal() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_polls(vec![confirmed_failure()]);
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let outcome = client.update_note(7, OWNER, "T2", "Qm456").await;
    assert!(matches!(outcome, Err(ClientError::LedgerRejected(_))));

    // terminal on the first poll: no further polls, no resubmission
    assert_eq!(ledger.get_transaction_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sequence_conflict_surfaces_as_ledger_rejection() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_send(SendTransactionResult {
        hash: TxHash::from(HASH),
        status: SendStatus::Error,
        error_message: Some("tx bad seq".to_owned()),
    });
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let outcome = client.create_note(OWNER, "T1", "Qm123").await;
    match outcome {
        Err(ClientError::LedgerRejected(reason)) => assert!(reason.contains("bad seq")),
        other => panic!("expected LedgerRejected, got {:?}", other),
    }
    assert_eq!(ledger.get_transaction_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_prepare_raises_fee_to_simulated_resource_fee() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_simulation(
        "create_note",
        SimulateTransactionResult {
            return_value: None,
            resource_fee: Some(5000),
            error: None,
        },
    );
    ledger.script_polls(vec![confirmed_with(ScValue::u64(1))]);
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet.clone());

    client.create_note(OWNER, "T1", "Qm123").await.unwrap();

    let envelope = wallet.last_signed_envelope().unwrap();
    assert_eq!(envelope.fee, 5000);
}

#[tokio::test]
async fn test_failed_prepare_simulation_rejects_before_signing() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_simulation(
        "create_note",
        SimulateTransactionResult {
            return_value: None,
            resource_fee: None,
            error: Some("host function panicked".to_owned()),
        },
    );
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet.clone());

    let outcome = client.create_note(OWNER, "T1", "Qm123").await;
    assert!(matches!(outcome, Err(ClientError::LedgerRejected(_))));
    assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reads_degrade_to_neutral_defaults() {
    let ledger = Arc::new(MockLedger {
        fail_simulation: true,
        ..MockLedger::default()
    });
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    assert!(client.get_user_notes(OWNER).await.is_empty());
    assert_eq!(client.get_user_stats(OWNER).await, (0, 0));
    assert_eq!(client.get_note_fee().await, DEFAULT_NOTE_FEE);
    assert_eq!(client.get_total_notes_count().await, 0);
    assert!(client.get_note(7, OWNER).await.is_none());
    assert!(client.get_dev_wallet().await.is_none());
}

#[tokio::test]
async fn test_read_path_is_idempotent() {
    let ledger = Arc::new(MockLedger::default());
    ledger.script_simulation(
        "get_user_notes",
        simulation_returning(ScValue::Vec(vec![
            note_value(1, "first", "QmA", true),
            note_value(2, "second", "QmB", true),
        ])),
    );
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let first = client.get_user_notes(OWNER).await;
    let second = client.get_user_notes(OWNER).await;

    assert_eq!(first, second);
    let ids: Vec<u64> = first.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![1, 2]);
    // listing never touches account, signing or submission
    assert_eq!(ledger.get_account_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.send_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_query_decoding() {
    let ledger = Arc::new(MockLedger::default());
    ledger.script_simulation(
        "get_user_stats",
        simulation_returning(ScValue::Vec(vec![ScValue::u64(3), ScValue::u64(2)])),
    );
    ledger.script_simulation(
        "get_note_fee",
        simulation_returning(ScValue::i128(1_000_000)),
    );
    ledger.script_simulation(
        "get_note",
        simulation_returning(note_value(7, "T1", "Qm123", true)),
    );
    ledger.script_simulation(
        "get_dev_wallet",
        simulation_returning(ScValue::address(OWNER.parse().unwrap())),
    );
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    assert_eq!(client.get_user_stats(OWNER).await, (3, 2));
    assert_eq!(client.get_note_fee().await, 1_000_000);

    let note = client.get_note(7, OWNER).await.unwrap();
    assert_eq!(note.id, 7);

    let dev_wallet = client.get_dev_wallet().await.unwrap();
    assert_eq!(dev_wallet.to_string(), OWNER);
}

#[tokio::test]
async fn test_inactive_note_reads_back_as_void() {
    let ledger = Arc::new(MockLedger::default());
    ledger.script_simulation("get_note", simulation_returning(ScValue::Void));
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    assert!(client.get_note(7, OWNER).await.is_none());
}

#[tokio::test]
async fn test_bridge_reports_connected_address() {
    let ledger = Arc::new(MockLedger::default());
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger, wallet);

    let address = client.get_signer().connected_address().await.unwrap();
    assert_eq!(address.to_string(), OWNER);
}

#[tokio::test]
async fn test_delete_note_decodes_confirmation() {
    let ledger = Arc::new(MockLedger::with_sequence(41));
    ledger.script_polls(vec![confirmed_with(ScValue::Bool(true))]);
    let wallet = Arc::new(MockWallet::approving());
    let client = make_client(ledger.clone(), wallet);

    let deleted = client.delete_note(7, OWNER).await.unwrap();
    assert!(deleted);
}
