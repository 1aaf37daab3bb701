// RPC endpoint by default when no specified
pub const DEFAULT_RPC_ADDRESS: &str = "https://soroban-testnet.stellar.org";

// Seconds between two confirmation polls
pub const POLL_INTERVAL_SECS: u64 = 2;

// Confirmation polls before the transaction fate is declared indeterminate
// Together with the interval this bounds the wait to roughly 20 seconds
pub const MAX_POLL_ATTEMPTS: usize = 10;
