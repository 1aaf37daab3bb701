// Network passphrases, used as the signature domain of an envelope
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

// 7 decimals numbers
pub const COIN_DECIMALS: u8 = 7;
// 10 000 000 stroops to represent 1 lumen
pub const STROOPS_PER_LUMEN: u64 = 10u64.pow(COIN_DECIMALS as u32);

// Base inclusion fee per operation, in stroops
// The prepare step may raise it to cover simulated resource usage
pub const BASE_FEE: u64 = 100;

// Fee charged by the notes contract per create/update
// Used as the neutral default when the contract cannot be queried
pub const DEFAULT_NOTE_FEE: i128 = 1_000_000;

// Expiry horizon of a built envelope when the caller does not override it
// A stale envelope is provably rejectable by the ledger after this window,
// which bounds how long a half-submitted operation can stay ambiguous
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 30;
